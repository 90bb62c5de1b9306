use plagcheck_core::{Configuration, CorpusReport, Distribution, PairResult, ScanStats};

use crate::args::OutputMode;

pub(crate) fn format_scan_stats(stats: &ScanStats) -> String {
    let mut out = String::new();
    out.push_str("== scan stats ==\n");
    out.push_str(&format!(
        "candidates={} scanned={} bytes={}\n",
        stats.candidate_files, stats.scanned_files, stats.scanned_bytes
    ));

    let mut skips: Vec<(&str, u64)> = vec![
        ("missing_roots", stats.skipped_missing_roots),
        ("not_found", stats.skipped_not_found),
        ("permission_denied", stats.skipped_permission_denied),
        ("too_large", stats.skipped_too_large),
        ("binary", stats.skipped_binary),
        ("walk_errors", stats.skipped_walk_errors),
    ];
    skips.retain(|(_, v)| *v > 0);
    if !skips.is_empty() {
        out.push_str("skipped:\n");
        for (k, v) in skips {
            out.push_str(&format!("- {k}={v}\n"));
        }
    }
    out.push('\n');
    out
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn format_optional(value: Option<f64>, as_percent: bool) -> String {
    match value {
        Some(v) if as_percent => percent(v),
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

fn format_distribution(out: &mut String, label: &str, d: &Distribution, as_percent: bool) {
    out.push_str(&format!(
        "{label:<18} avg={:<8} poi={:<8} samples={}\n",
        format_optional(d.average, as_percent),
        format_optional(d.poi, as_percent),
        d.samples
    ));
}

fn format_summary(out: &mut String, report: &CorpusReport) {
    out.push_str("== statistics ==\n");
    out.push_str(&format!(
        "submissions={} matching_pairs={}\n",
        report.submissions.len(),
        report.results.len()
    ));
    format_distribution(out, "similarity", &report.statistics.similarity, true);
    format_distribution(out, "token count", &report.statistics.token_count, false);
    format_distribution(
        out,
        "tokens per match",
        &report.statistics.tokens_per_match,
        false,
    );
    out.push('\n');

    out.push_str(&format!(
        "== friends (threshold {}) ==\n",
        percent(report.friend_threshold)
    ));
    if report.friends.is_empty() {
        out.push_str("(none)\n");
    }
    for friend in &report.friends {
        let ranks: Vec<String> = friend
            .in_matches()
            .iter()
            .map(|r| (r + 1).to_string())
            .collect();
        out.push_str(&format!(
            "{} sum={:.2} pairs={} ranks={}\n",
            friend.submission().path(),
            friend.sum_similarity(),
            friend.in_matches().len(),
            ranks.join(",")
        ));
    }
    out.push('\n');
}

fn format_table_row(out: &mut String, result: &PairResult) {
    let rank = result.rank().map_or_else(|| "-".to_string(), |r| (r + 1).to_string());
    out.push_str(&format!(
        "{rank:>5}  {:>7}  {}  {:>7}  {}  matches={} tokens={}\n",
        percent(result.similarity_a()),
        result.a().path(),
        percent(result.similarity_b()),
        result.b().path(),
        result.match_count(),
        result.token_count()
    ));
}

fn format_runs(out: &mut String, result: &PairResult) {
    for run in result.matches() {
        out.push_str(&format!(
            "  run {} tokens={} A[{}..{}] B[{}..{}]\n",
            run.index() + 1,
            run.len(),
            run.a_range().start,
            run.a_range().end,
            run.b_range().start,
            run.b_range().end
        ));
        out.push_str(&format!("    A: {}\n", run.text_a(result.a())));
        out.push_str(&format!("    B: {}\n", run.text_b(result.b())));
    }
}

pub(crate) fn format_text_report(
    report: &CorpusReport,
    cfg: &Configuration,
    mode: OutputMode,
    limit: Option<usize>,
) -> String {
    let mut out = String::new();
    format_summary(&mut out, report);
    if mode == OutputMode::Summary {
        return out;
    }

    let listed: Vec<&PairResult> = report
        .reportable(cfg.min_similarity)
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    out.push_str(&format!(
        "== results (min similarity {}) ==\n",
        percent(cfg.min_similarity)
    ));
    if listed.is_empty() {
        out.push_str("(none)\n");
    }
    for result in listed {
        format_table_row(&mut out, result);
        if mode == OutputMode::Detailed {
            format_runs(&mut out, result);
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use plagcheck_core::{CompareRunOptions, NoProgress, Submission, Tokenizer, check};

    use super::*;

    fn report(cfg: &Configuration) -> CorpusReport {
        let tokenizer = Tokenizer::default();
        let subs = vec![
            Arc::new(Submission::from_source(
                "a.c",
                "int main ( ) { return 0 ; }",
                &tokenizer,
            )),
            Arc::new(Submission::from_source(
                "b.c",
                "int main ( ) { return 0 ; }",
                &tokenizer,
            )),
        ];
        check(subs, cfg, &CompareRunOptions::default(), &NoProgress).unwrap()
    }

    fn small_config() -> Configuration {
        Configuration {
            min_match_length: 3,
            ..Configuration::default()
        }
    }

    #[test]
    fn table_lists_ranked_pairs() {
        let cfg = small_config();
        let text = format_text_report(&report(&cfg), &cfg, OutputMode::Table, None);
        assert!(text.contains("== statistics =="));
        assert!(text.contains("submissions=2 matching_pairs=1"));
        assert!(text.contains("100.0%  a.c   100.0%  b.c  matches=1 tokens=9"));
        assert!(!text.contains("run 1"));
    }

    #[test]
    fn summary_omits_results_and_detailed_adds_runs() {
        let cfg = small_config();
        let report = report(&cfg);

        let summary = format_text_report(&report, &cfg, OutputMode::Summary, None);
        assert!(!summary.contains("== results"));

        let detailed = format_text_report(&report, &cfg, OutputMode::Detailed, None);
        assert!(detailed.contains("run 1 tokens=9 A[0..9] B[0..9]"));
        assert!(detailed.contains("    A: int main ( ) { return 0 ; }"));
    }

    #[test]
    fn scan_stats_list_only_nonzero_skips() {
        let stats = ScanStats {
            candidate_files: 3,
            scanned_files: 2,
            skipped_binary: 1,
            ..ScanStats::default()
        };
        let text = format_scan_stats(&stats);
        assert!(text.contains("candidates=3 scanned=2"));
        assert!(text.contains("- binary=1"));
        assert!(!text.contains("too_large"));
        assert!(stats.has_skips());
        assert!(
            !ScanStats {
                skipped_too_large: 4,
                ..ScanStats::default()
            }
            .has_skips()
        );
    }
}
