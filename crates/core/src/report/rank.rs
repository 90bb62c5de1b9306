use std::cmp::Ordering;

use crate::compare::PairResult;
use crate::util::{average, point_of_interest};

/// Average and point of interest of one statistic over all matching pairs.
///
/// `average` needs one sample, `poi` needs three (a discrete second derivative).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Distribution {
    pub average: Option<f64>,
    pub poi: Option<f64>,
    pub samples: usize,
}

impl Distribution {
    pub fn from_samples(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        Self {
            average: average(&values),
            poi: point_of_interest(&values),
            samples: values.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorpusStatistics {
    /// Both sides of every pair, flattened.
    pub similarity: Distribution,
    pub token_count: Distribution,
    pub tokens_per_match: Distribution,
}

impl CorpusStatistics {
    pub fn from_results(results: &[PairResult]) -> Self {
        let matching = || results.iter().filter(|r| r.match_count() > 0);
        Self {
            similarity: Distribution::from_samples(
                matching()
                    .flat_map(|r| [r.similarity_a(), r.similarity_b()])
                    .collect(),
            ),
            token_count: Distribution::from_samples(
                matching().map(|r| r.token_count() as f64).collect(),
            ),
            tokens_per_match: Distribution::from_samples(
                matching().map(PairResult::tokens_per_match).collect(),
            ),
        }
    }

    /// Similarity POI, `0.0` when there are too few samples.
    pub fn poi_similarity(&self) -> f64 {
        self.similarity.poi.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct RankedResults {
    pub results: Vec<PairResult>,
    pub statistics: CorpusStatistics,
}

pub(crate) fn compare_for_rank(x: &PairResult, y: &PairResult) -> Ordering {
    y.max_similarity()
        .total_cmp(&x.max_similarity())
        .then_with(|| y.min_similarity().total_cmp(&x.min_similarity()))
}

/// Drops pairs without matches, sorts the rest (stable) and assigns ranks.
pub fn aggregate(results: Vec<PairResult>) -> RankedResults {
    let mut results: Vec<PairResult> = results
        .into_iter()
        .filter(|r| r.match_count() > 0)
        .collect();
    results.sort_by(compare_for_rank);
    for (rank, result) in results.iter_mut().enumerate() {
        result.set_rank(rank);
    }

    let statistics = CorpusStatistics::from_results(&results);
    RankedResults {
        results,
        statistics,
    }
}
