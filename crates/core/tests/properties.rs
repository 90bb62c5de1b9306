//! Property tests for the pair matcher.
//!
//! Verifies:
//! 1. Accepted runs never share a token on either side
//! 2. Similarities stay within `[0, 1]`
//! 3. Every accepted run honours the distinct-text and common-token thresholds
//! 4. Comparing identical inputs is symmetric

use std::collections::HashSet;
use std::sync::Arc;

use plagcheck_core::{Configuration, PairMatcher, Submission, Token};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Small alphabet so that random streams actually share runs.
fn token_stream() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]), 0..40)
        .prop_map(|v| v.into_iter().map(str::to_string).collect())
}

fn config_strategy() -> impl Strategy<Value = Configuration> {
    (1usize..=4, 1usize..=4, 1u32..=10).prop_map(|(min_len, distance, common)| Configuration {
        min_match_length: min_len,
        max_match_distance: distance,
        min_common_token: f64::from(common) / 10.0,
        ..Configuration::default()
    })
}

fn submission(path: &str, words: &[String]) -> Arc<Submission> {
    let tokens = words
        .iter()
        .enumerate()
        .map(|(i, w)| Token::new(w.as_str(), i * 2))
        .collect();
    Arc::new(Submission::from_tokens(path, tokens))
}

// ============================================================================
// MATCHER PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_runs_are_disjoint(a in token_stream(), b in token_stream(), cfg in config_strategy()) {
        let result = PairMatcher::new(&cfg).compare(&submission("a", &a), &submission("b", &b));

        let mut seen_a = HashSet::new();
        let mut seen_b = HashSet::new();
        for run in result.matches() {
            prop_assert_eq!(run.a_range().len(), run.b_range().len());
            for idx in run.a_range() {
                prop_assert!(seen_a.insert(idx));
            }
            for idx in run.b_range() {
                prop_assert!(seen_b.insert(idx));
            }
        }
        prop_assert_eq!(result.token_count(), seen_a.len());
    }

    #[test]
    fn prop_similarity_in_unit_range(a in token_stream(), b in token_stream(), cfg in config_strategy()) {
        let result = PairMatcher::new(&cfg).compare(&submission("a", &a), &submission("b", &b));

        for sim in [result.similarity_a(), result.similarity_b()] {
            prop_assert!(sim.is_finite());
            prop_assert!((0.0..=1.0).contains(&sim));
        }
        prop_assert!(result.token_count() <= a.len().min(b.len()));
    }

    #[test]
    fn prop_accepted_runs_meet_thresholds(a in token_stream(), b in token_stream(), cfg in config_strategy()) {
        let sa = submission("a", &a);
        let sb = submission("b", &b);
        let result = PairMatcher::new(&cfg).compare(&sa, &sb);

        for run in result.matches() {
            let distinct_a: HashSet<&str> = run.tokens_a(&sa).iter().map(Token::text).collect();
            let distinct_b: HashSet<&str> = run.tokens_b(&sb).iter().map(Token::text).collect();
            let common = distinct_a.intersection(&distinct_b).count();
            prop_assert!(distinct_a.len() >= cfg.min_match_length);
            prop_assert!(common as f64 / distinct_a.len() as f64 >= cfg.min_common_token);
        }
    }

    #[test]
    fn prop_identical_inputs_are_symmetric(a in token_stream(), cfg in config_strategy()) {
        let x = submission("x", &a);
        let y = submission("y", &a);
        let matcher = PairMatcher::new(&cfg);

        let xy = matcher.compare(&x, &y);
        let yx = matcher.compare(&y, &x);
        prop_assert_eq!(xy.token_count(), yx.token_count());
        prop_assert_eq!(xy.similarity_a(), xy.similarity_b());
        prop_assert_eq!(xy.similarity_a(), yx.similarity_a());
    }
}
