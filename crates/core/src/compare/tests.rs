use super::*;

fn submission(path: &str, words: &str) -> Arc<Submission> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    for word in words.split_whitespace() {
        tokens.push(Token::new(word, offset));
        offset += word.len() + 1;
    }
    Arc::new(Submission::from_tokens(path, tokens))
}

fn matcher(min_match_length: usize, max_match_distance: usize, min_common_token: f64) -> PairMatcher {
    PairMatcher::new(&Configuration {
        min_match_length,
        max_match_distance,
        min_common_token,
        ..Configuration::default()
    })
}

fn assert_disjoint(result: &PairResult) {
    let mut seen_a = HashSet::new();
    let mut seen_b = HashSet::new();
    for run in result.matches() {
        for idx in run.a_range() {
            assert!(seen_a.insert(idx), "A token {idx} claimed twice");
        }
        for idx in run.b_range() {
            assert!(seen_b.insert(idx), "B token {idx} claimed twice");
        }
    }
}

#[test]
fn tolerated_mismatch_stays_in_one_run() {
    let a = submission("a.c", "a b c d e");
    let b = submission("b.c", "a b x d e");

    let result = matcher(3, 2, 0.6).compare(&a, &b);
    assert_eq!(result.match_count(), 1);
    let run = &result.matches()[0];
    assert_eq!(run.a_range(), 0..5);
    assert_eq!(run.b_range(), 0..5);
    assert_eq!(run.index(), 0);
    assert_eq!(run.text_a(&a), "a b c d e");
    assert_eq!(run.text_b(&b), "a b x d e");
    assert_eq!(result.token_count(), 5);
    assert_eq!(result.similarity_a(), 1.0);
    assert_eq!(result.similarity_b(), 1.0);
}

#[test]
fn common_token_ratio_is_inclusive_at_the_boundary() {
    let a = submission("a.c", "a b c d e");
    let b = submission("b.c", "a b x d e");

    // 4 of 5 distinct texts are shared.
    let accepted = matcher(5, 2, 0.8).compare(&a, &b);
    assert_eq!(accepted.match_count(), 1);
    assert_eq!(accepted.token_count(), 5);

    let rejected = matcher(5, 2, 0.81).compare(&a, &b);
    assert_eq!(rejected.match_count(), 0);
    assert_eq!(rejected.token_count(), 0);
    assert_eq!(rejected.similarity_a(), 0.0);
}

#[test]
fn min_match_length_counts_distinct_texts() {
    let a = submission("a.c", "x x x x x x");
    let b = submission("b.c", "x x x x x x");

    let result = matcher(2, 1, 1.0).compare(&a, &b);
    assert_eq!(result.match_count(), 0);

    let result = matcher(1, 1, 1.0).compare(&a, &b);
    assert_eq!(result.match_count(), 1);
    assert_eq!(result.token_count(), 6);
}

#[test]
fn fewer_mismatches_than_the_distance_keep_the_run_open() {
    let a = submission("a.c", "a b c X Y f g h");
    let b = submission("b.c", "a b c P Q f g h");

    let result = matcher(3, 3, 0.7).compare(&a, &b);
    assert_eq!(result.match_count(), 1);
    assert_eq!(result.matches()[0].len(), 8);
    assert_eq!(result.token_count(), 8);
    assert_disjoint(&result);
}

#[test]
fn reaching_the_distance_closes_the_run() {
    let a = submission("a.c", "a b c X Y Z f g h");
    let b = submission("b.c", "a b c P Q R f g h");

    let result = matcher(3, 3, 0.5).compare(&a, &b);
    let lens: Vec<usize> = result.matches().iter().map(MatchRun::len).collect();
    assert_eq!(lens, vec![5, 3]);
    assert_eq!(result.matches()[0].text_a(&a), "a b c X Y");
    assert_eq!(result.matches()[1].a_range(), 6..9);
    assert_eq!(result.matches()[1].b_range(), 6..9);
    assert_eq!(result.matches()[1].index(), 1);
    assert_eq!(result.token_count(), 8);
    assert!((result.similarity_a() - 8.0 / 9.0).abs() < 1e-12);
    assert_disjoint(&result);
}

#[test]
fn strict_distance_rejects_any_mismatch() {
    let a = submission("a.c", "a b c X e f g");
    let b = submission("b.c", "a b c P e f g");

    let result = matcher(3, 1, 1.0).compare(&a, &b);
    let lens: Vec<usize> = result.matches().iter().map(MatchRun::len).collect();
    assert_eq!(lens, vec![3, 3]);
    assert_eq!(result.token_count(), 6);
}

#[test]
fn a_token_is_claimed_by_at_most_one_run() {
    let a = submission("a.c", "a b c a b c");
    let b = submission("b.c", "a b c");

    let result = matcher(3, 1, 1.0).compare(&a, &b);
    assert_eq!(result.match_count(), 1);
    assert_eq!(result.matches()[0].a_range(), 0..3);
    assert_eq!(result.token_count(), 3);
    assert_eq!(result.similarity_a(), 0.5);
    assert_eq!(result.similarity_b(), 1.0);
    assert_eq!(result.max_similarity(), 1.0);
    assert_eq!(result.min_similarity(), 0.5);
    assert_disjoint(&result);
}

#[test]
fn identical_submissions_are_fully_similar() {
    let text = "t0 t1 t2 t3 t4 t5 t6 t7 t8 t9";
    let a = submission("a.c", text);
    let b = submission("b.c", text);

    let result = matcher(5, 2, 0.9).compare(&a, &b);
    assert_eq!(result.match_count(), 1);
    assert_eq!(result.token_count(), 10);
    assert_eq!(result.similarity_a(), 1.0);
    assert_eq!(result.similarity_b(), 1.0);
    assert_eq!(result.tokens_per_match(), 10.0);
    assert_eq!(result.rank(), None);
}

#[test]
fn empty_submission_yields_zero_similarity() {
    let empty = submission("empty.c", "");
    let other = submission("b.c", "a b c d e");

    for (a, b) in [(&empty, &other), (&other, &empty), (&empty, &empty)] {
        let result = matcher(1, 2, 0.5).compare(a, b);
        assert_eq!(result.match_count(), 0);
        assert_eq!(result.token_count(), 0);
        assert_eq!(result.similarity_a(), 0.0);
        assert_eq!(result.similarity_b(), 0.0);
        assert_eq!(result.tokens_per_match(), 0.0);
    }
}

#[test]
fn swapping_sides_keeps_matched_token_count() {
    let a = submission("a.c", "a b c X Y f g h");
    let b = submission("b.c", "a b c P Q f g h");
    let m = matcher(3, 3, 0.7);

    let ab = m.compare(&a, &b);
    let ba = m.compare(&b, &a);
    assert_eq!(ab.token_count(), ba.token_count());
    assert_eq!(ab.similarity_a(), ba.similarity_b());
    assert_eq!(ba.a().path(), "b.c");
}

#[test]
fn unrelated_submissions_have_no_matches() {
    let a = submission("a.c", "a b c d e f");
    let b = submission("b.c", "u v w x y z");

    let result = matcher(1, 3, 0.1).compare(&a, &b);
    assert!(result.matches().is_empty());
    assert_eq!(result.max_similarity(), 0.0);
}
