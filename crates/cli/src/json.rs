use std::io;

use plagcheck_core::{
    Configuration, CorpusReport, Distribution, FriendOf, MatchRun, PairResult, ScanStats,
    Submission, Token,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonScanStats {
    pub(crate) candidate_files: u64,
    pub(crate) scanned_files: u64,
    pub(crate) scanned_bytes: u64,
    pub(crate) skipped_missing_roots: u64,
    pub(crate) skipped_not_found: u64,
    pub(crate) skipped_permission_denied: u64,
    pub(crate) skipped_too_large: u64,
    pub(crate) skipped_binary: u64,
    pub(crate) skipped_walk_errors: u64,
}

impl From<&ScanStats> for JsonScanStats {
    fn from(stats: &ScanStats) -> Self {
        Self {
            candidate_files: stats.candidate_files,
            scanned_files: stats.scanned_files,
            scanned_bytes: stats.scanned_bytes,
            skipped_missing_roots: stats.skipped_missing_roots,
            skipped_not_found: stats.skipped_not_found,
            skipped_permission_denied: stats.skipped_permission_denied,
            skipped_too_large: stats.skipped_too_large,
            skipped_binary: stats.skipped_binary,
            skipped_walk_errors: stats.skipped_walk_errors,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonMatchRun {
    pub(crate) a_start: usize,
    pub(crate) a_end: usize,
    pub(crate) b_start: usize,
    pub(crate) b_end: usize,
    pub(crate) token_count: usize,
    /// Byte span of the run in A's source text.
    pub(crate) a_bytes: (usize, usize),
    pub(crate) b_bytes: (usize, usize),
}

fn byte_span(run: &[Token]) -> (usize, usize) {
    match (run.first(), run.last()) {
        (Some(first), Some(last)) => (first.start(), last.end()),
        _ => (0, 0),
    }
}

impl JsonMatchRun {
    fn new(run: &MatchRun, a: &Submission, b: &Submission) -> Self {
        Self {
            a_start: run.a_range().start,
            a_end: run.a_range().end,
            b_start: run.b_range().start,
            b_end: run.b_range().end,
            token_count: run.len(),
            a_bytes: byte_span(run.tokens_a(a)),
            b_bytes: byte_span(run.tokens_b(b)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonPairResult {
    pub(crate) rank: Option<usize>,
    pub(crate) a: String,
    pub(crate) b: String,
    pub(crate) similarity_a: f64,
    pub(crate) similarity_b: f64,
    pub(crate) token_count: usize,
    pub(crate) match_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) matches: Option<Vec<JsonMatchRun>>,
}

impl JsonPairResult {
    pub(crate) fn new(result: &PairResult, with_matches: bool) -> Self {
        let matches = with_matches.then(|| {
            result
                .matches()
                .iter()
                .map(|run| JsonMatchRun::new(run, result.a(), result.b()))
                .collect()
        });
        Self {
            rank: result.rank(),
            a: result.a().path().to_string(),
            b: result.b().path().to_string(),
            similarity_a: result.similarity_a(),
            similarity_b: result.similarity_b(),
            token_count: result.token_count(),
            match_count: result.match_count(),
            matches,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDistribution {
    pub(crate) average: Option<f64>,
    pub(crate) poi: Option<f64>,
    pub(crate) samples: usize,
}

impl From<&Distribution> for JsonDistribution {
    fn from(d: &Distribution) -> Self {
        Self {
            average: d.average,
            poi: d.poi,
            samples: d.samples,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonStatistics {
    pub(crate) similarity: JsonDistribution,
    pub(crate) token_count: JsonDistribution,
    pub(crate) tokens_per_match: JsonDistribution,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonFriend {
    pub(crate) path: String,
    pub(crate) sum_similarity: f64,
    /// Ranks of the contributing pairs.
    pub(crate) in_matches: Vec<usize>,
}

impl From<&FriendOf> for JsonFriend {
    fn from(f: &FriendOf) -> Self {
        Self {
            path: f.submission().path().to_string(),
            sum_similarity: f.sum_similarity(),
            in_matches: f.in_matches().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonReport {
    pub(crate) submissions: usize,
    pub(crate) configuration: Configuration,
    pub(crate) statistics: JsonStatistics,
    pub(crate) friend_threshold: f64,
    pub(crate) friends: Vec<JsonFriend>,
    pub(crate) results: Vec<JsonPairResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scan_stats: Option<JsonScanStats>,
}

pub(crate) fn map_report(
    report: &CorpusReport,
    cfg: &Configuration,
    limit: Option<usize>,
    with_matches: bool,
) -> JsonReport {
    JsonReport {
        submissions: report.submissions.len(),
        configuration: cfg.clone(),
        statistics: JsonStatistics {
            similarity: (&report.statistics.similarity).into(),
            token_count: (&report.statistics.token_count).into(),
            tokens_per_match: (&report.statistics.tokens_per_match).into(),
        },
        friend_threshold: report.friend_threshold,
        friends: report.friends.iter().map(JsonFriend::from).collect(),
        results: report
            .reportable(cfg.min_similarity)
            .take(limit.unwrap_or(usize::MAX))
            .map(|r| JsonPairResult::new(r, with_matches))
            .collect(),
        scan_stats: None,
    }
}

pub(crate) fn write_json<T: Serialize>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("json encode: {e}")))?;
    println!("{json}");
    Ok(())
}
