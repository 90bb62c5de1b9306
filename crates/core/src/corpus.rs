use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;

use crate::compare::{PairMatcher, PairResult};
use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::report::{CorpusReport, FriendFinder, aggregate};
use crate::submission::Submission;

/// Receives progress ticks from the comparison phase. Called from worker threads.
pub trait ProgressReporter: Send + Sync {
    fn start(&self) {}
    fn progress(&self, fraction: f64);
    fn end(&self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn progress(&self, _fraction: f64) {}
}

#[derive(Debug, Default, Clone)]
pub struct CompareRunOptions {
    /// Only pair submissions whose file extensions are equal.
    pub same_extension_only: bool,
    /// Checked before each pair; once set, remaining pairs are skipped.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl CompareRunOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Every unordered pair `(i, j)` with `i < j`, in lexicographic order.
pub fn pair_indices(submissions: &[Arc<Submission>], same_extension_only: bool) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for i in 0..submissions.len() {
        for j in (i + 1)..submissions.len() {
            if same_extension_only && submissions[i].extension() != submissions[j].extension() {
                continue;
            }
            out.push((i, j));
        }
    }
    out
}

/// Compares every pair on the rayon pool.
///
/// Results are collected behind one lock and put back into pair order after all workers have
/// finished, so the output does not depend on scheduling.
pub fn compare_all(
    submissions: &[Arc<Submission>],
    cfg: &Configuration,
    run: &CompareRunOptions,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PairResult>> {
    cfg.validate()?;

    let pairs = pair_indices(submissions, run.same_extension_only);
    let total = pairs.len();
    let matcher = PairMatcher::new(cfg);
    let completed = AtomicUsize::new(0);
    let collected: Mutex<Vec<(usize, PairResult)>> = Mutex::new(Vec::with_capacity(total));

    tracing::info!(submissions = submissions.len(), pairs = total, "comparing submissions");
    let started = Instant::now();
    progress.start();

    pairs.par_iter().enumerate().for_each(|(pair_idx, &(i, j))| {
        if run.is_cancelled() {
            return;
        }
        let result = matcher.compare(&submissions[i], &submissions[j]);
        collected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((pair_idx, result));

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        progress.progress(done as f64 / total as f64);
    });

    progress.end();

    let mut collected = collected
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    if collected.len() < total {
        tracing::warn!(completed = collected.len(), total, "comparison cancelled");
        return Err(Error::Cancelled {
            completed: collected.len(),
            total,
        });
    }
    collected.sort_by_key(|(pair_idx, _)| *pair_idx);

    tracing::info!(
        pairs = total,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "comparison finished"
    );
    Ok(collected.into_iter().map(|(_, result)| result).collect())
}

/// Full pipeline over already tokenized submissions: compare every pair, rank, find friends.
pub fn check(
    submissions: Vec<Arc<Submission>>,
    cfg: &Configuration,
    run: &CompareRunOptions,
    progress: &dyn ProgressReporter,
) -> Result<CorpusReport> {
    cfg.validate()?;

    let results = compare_all(&submissions, cfg, run, progress)?;
    let ranked = aggregate(results);
    tracing::debug!(
        matching_pairs = ranked.results.len(),
        poi = ?ranked.statistics.similarity.poi,
        "aggregated results"
    );

    let finder = FriendFinder::new(cfg);
    let friend_threshold = finder.effective_threshold(&ranked.statistics);
    let friends = finder.find(&ranked.statistics, &ranked.results);

    Ok(CorpusReport {
        submissions,
        results: ranked.results,
        statistics: ranked.statistics,
        friends,
        friend_threshold,
    })
}
