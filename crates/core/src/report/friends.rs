use std::collections::HashMap;
use std::sync::Arc;

use crate::compare::PairResult;
use crate::config::Configuration;
use crate::submission::Submission;

use super::rank::CorpusStatistics;

/// How far below the similarity POI the automatic friend threshold sits.
pub const AUTO_THRESHOLD_OFFSET: f64 = 0.2;

/// A submission that other submissions draw from repeatedly.
#[derive(Debug, Clone)]
pub struct FriendOf {
    submission: Arc<Submission>,
    sum_similarity: f64,
    in_matches: Vec<usize>,
}

impl FriendOf {
    fn new(submission: Arc<Submission>) -> Self {
        Self {
            submission,
            sum_similarity: 0.0,
            in_matches: Vec::new(),
        }
    }

    pub fn submission(&self) -> &Arc<Submission> {
        &self.submission
    }

    pub fn sum_similarity(&self) -> f64 {
        self.sum_similarity
    }

    /// Positions of the contributing pairs in the result list handed to `find`.
    pub fn in_matches(&self) -> &[usize] {
        &self.in_matches
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FriendFinder {
    min_friend_finder_similarity: f64,
    min_similarity: f64,
}

impl FriendFinder {
    pub fn new(cfg: &Configuration) -> Self {
        Self {
            min_friend_finder_similarity: cfg.min_friend_finder_similarity,
            min_similarity: cfg.min_similarity,
        }
    }

    pub fn effective_threshold(&self, statistics: &CorpusStatistics) -> f64 {
        let threshold = if self.min_friend_finder_similarity >= 0.0 {
            self.min_friend_finder_similarity
        } else {
            statistics.poi_similarity() - AUTO_THRESHOLD_OFFSET
        };
        threshold.max(self.min_similarity)
    }

    /// Each side is credited with the *other* side's similarity: A collects `similarity_b`,
    /// B collects `similarity_a`.
    pub fn find(&self, statistics: &CorpusStatistics, results: &[PairResult]) -> Vec<FriendOf> {
        let threshold = self.effective_threshold(statistics);
        // A non-positive threshold would put every matching pair into one group.
        if threshold <= 0.0 {
            tracing::debug!(threshold, "friend finder disabled by non-positive threshold");
            return Vec::new();
        }

        let mut friends: HashMap<Arc<str>, FriendOf> = HashMap::new();
        for (idx, result) in results.iter().enumerate() {
            credit(&mut friends, idx, result.a(), result.similarity_b(), threshold);
            credit(&mut friends, idx, result.b(), result.similarity_a(), threshold);
        }

        let mut out: Vec<FriendOf> = friends
            .into_values()
            .filter(|f| f.in_matches.len() > 1)
            .collect();
        out.sort_by(|x, y| {
            y.sum_similarity
                .total_cmp(&x.sum_similarity)
                .then_with(|| x.submission.path().cmp(y.submission.path()))
        });

        tracing::debug!(threshold, friends = out.len(), "friend finder finished");
        out
    }
}

fn credit(
    friends: &mut HashMap<Arc<str>, FriendOf>,
    idx: usize,
    submission: &Arc<Submission>,
    similarity: f64,
    threshold: f64,
) {
    if similarity <= threshold {
        return;
    }
    let friend = friends
        .entry(submission.path_arc())
        .or_insert_with(|| FriendOf::new(Arc::clone(submission)));
    if friend.in_matches.last() == Some(&idx) {
        return;
    }
    friend.sum_similarity += similarity;
    friend.in_matches.push(idx);
}
