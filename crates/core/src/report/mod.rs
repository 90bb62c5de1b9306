mod friends;
mod rank;


use std::sync::Arc;

use crate::compare::PairResult;
use crate::config::Configuration;
use crate::corpus::{CompareRunOptions, ProgressReporter, check};
use crate::error::Result;
use crate::scan::load_submissions;
use crate::submission::Submission;
use crate::types::{CollectOptions, ScanOutcome};

pub use friends::{AUTO_THRESHOLD_OFFSET, FriendFinder, FriendOf};
pub use rank::{CorpusStatistics, Distribution, RankedResults, aggregate};

/// Everything a reporter needs after a run. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct CorpusReport {
    pub submissions: Vec<Arc<Submission>>,
    /// Pairs with at least one match, ranked.
    pub results: Vec<PairResult>,
    pub statistics: CorpusStatistics,
    pub friends: Vec<FriendOf>,
    /// Threshold the friend finder actually used.
    pub friend_threshold: f64,
}

impl CorpusReport {
    /// Ranked results whose more similar side reaches `min_similarity`.
    pub fn reportable<'r>(&'r self, min_similarity: f64) -> impl Iterator<Item = &'r PairResult> {
        self.results
            .iter()
            .filter(move |r| r.max_similarity() >= min_similarity)
    }
}

pub fn generate_report(
    options: &CollectOptions,
    cfg: &Configuration,
    run: &CompareRunOptions,
    progress: &dyn ProgressReporter,
) -> Result<CorpusReport> {
    Ok(generate_report_with_stats(options, cfg, run, progress)?.result)
}

/// Collects, tokenizes and compares every file reachable from `options`.
pub fn generate_report_with_stats(
    options: &CollectOptions,
    cfg: &Configuration,
    run: &CompareRunOptions,
    progress: &dyn ProgressReporter,
) -> Result<ScanOutcome<CorpusReport>> {
    cfg.validate()?;

    let loaded = load_submissions(options)?;
    let report = check(loaded.result, cfg, run, progress)?;
    Ok(ScanOutcome {
        result: report,
        stats: loaded.stats,
    })
}
