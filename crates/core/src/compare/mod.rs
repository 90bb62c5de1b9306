use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use crate::config::Configuration;
use crate::submission::Submission;
use crate::tokenize::Token;
use crate::util::ratio;

#[cfg(test)]
mod tests;

/// A gap-tolerant run of paired tokens.
///
/// Both cursors advance together while a run is open, so a run is always a pair of
/// contiguous, equal-length index ranges. Token identity is its index in the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRun {
    a_start: usize,
    b_start: usize,
    len: usize,
    index: usize,
}

impl MatchRun {
    pub fn a_range(&self) -> Range<usize> {
        self.a_start..self.a_start + self.len
    }

    pub fn b_range(&self) -> Range<usize> {
        self.b_start..self.b_start + self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position among the pair's accepted runs, longest first.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tokens_a<'s>(&self, a: &'s Submission) -> &'s [Token] {
        &a.tokens()[self.a_range()]
    }

    pub fn tokens_b<'s>(&self, b: &'s Submission) -> &'s [Token] {
        &b.tokens()[self.b_range()]
    }

    pub fn text_a(&self, a: &Submission) -> String {
        join_texts(self.tokens_a(a))
    }

    pub fn text_b(&self, b: &Submission) -> String {
        join_texts(self.tokens_b(b))
    }
}

fn join_texts(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(token.text());
    }
    out
}

/// Outcome of comparing two submissions. Metrics are computed once, on construction.
#[derive(Debug, Clone)]
pub struct PairResult {
    a: Arc<Submission>,
    b: Arc<Submission>,
    matches: Vec<MatchRun>,
    token_count: usize,
    similarity_a: f64,
    similarity_b: f64,
    rank: Option<usize>,
}

impl PairResult {
    fn seal(a: Arc<Submission>, b: Arc<Submission>, matches: Vec<MatchRun>) -> Self {
        let token_count = matches.iter().map(MatchRun::len).sum();
        let similarity_a = ratio(token_count, a.len());
        let similarity_b = ratio(token_count, b.len());
        Self {
            a,
            b,
            matches,
            token_count,
            similarity_a,
            similarity_b,
            rank: None,
        }
    }

    pub fn a(&self) -> &Arc<Submission> {
        &self.a
    }

    pub fn b(&self) -> &Arc<Submission> {
        &self.b
    }

    pub fn matches(&self) -> &[MatchRun] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Sum of run lengths on the A side, tolerated mismatches included.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn similarity_a(&self) -> f64 {
        self.similarity_a
    }

    pub fn similarity_b(&self) -> f64 {
        self.similarity_b
    }

    pub fn max_similarity(&self) -> f64 {
        self.similarity_a.max(self.similarity_b)
    }

    pub fn min_similarity(&self) -> f64 {
        self.similarity_a.min(self.similarity_b)
    }

    pub fn tokens_per_match(&self) -> f64 {
        ratio(self.token_count, self.matches.len())
    }

    /// Position in the corpus-wide ranking; `None` until the result has been aggregated.
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        debug_assert!(self.rank.is_none(), "rank is assigned once");
        self.rank = Some(rank);
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    a_start: usize,
    b_start: usize,
    len: usize,
}

impl Candidate {
    fn a_range(&self) -> Range<usize> {
        self.a_start..self.a_start + self.len
    }

    fn b_range(&self) -> Range<usize> {
        self.b_start..self.b_start + self.len
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PairMatcher {
    min_match_length: usize,
    max_match_distance: usize,
    min_common_token: f64,
}

impl PairMatcher {
    pub fn new(cfg: &Configuration) -> Self {
        Self {
            min_match_length: cfg.min_match_length,
            max_match_distance: cfg.max_match_distance,
            min_common_token: cfg.min_common_token,
        }
    }

    pub fn compare(&self, a: &Arc<Submission>, b: &Arc<Submission>) -> PairResult {
        let candidates = self.candidate_runs(a.tokens(), b.tokens());
        let matches = select_disjoint(candidates, a.len(), b.len());
        PairResult::seal(Arc::clone(a), Arc::clone(b), matches)
    }

    /// Greedy scan from every start offset in `a`. Overlapping candidates are expected here;
    /// `select_disjoint` resolves them.
    fn candidate_runs(&self, a: &[Token], b: &[Token]) -> Vec<Candidate> {
        let mut out = Vec::new();

        for start_a in 0..a.len() {
            let mut idx_a = start_a;
            // 0 = no open run, 1 = matching, n > 1 = n - 1 consecutive mismatches
            let mut gap = 0usize;
            let mut open: Option<Candidate> = None;

            for (idx_b, tok_b) in b.iter().enumerate() {
                let tok_a = &a[idx_a];

                if tok_a.text() == tok_b.text() {
                    extend(&mut open, idx_a, idx_b);
                    gap = 1;
                    idx_a += 1;
                    if idx_a >= a.len() {
                        break;
                    }
                } else if gap > 0 {
                    if gap >= self.max_match_distance {
                        self.finish(open.take(), a, b, &mut out);
                        gap = 0;
                    } else {
                        extend(&mut open, idx_a, idx_b);
                        gap += 1;
                        idx_a += 1;
                        if idx_a >= a.len() {
                            break;
                        }
                    }
                }
            }

            self.finish(open.take(), a, b, &mut out);
        }

        out
    }

    fn finish(&self, run: Option<Candidate>, a: &[Token], b: &[Token], out: &mut Vec<Candidate>) {
        let Some(run) = run else {
            return;
        };
        if self.accepts(&a[run.a_range()], &b[run.b_range()]) {
            out.push(run);
        }
    }

    fn accepts(&self, tokens_a: &[Token], tokens_b: &[Token]) -> bool {
        debug_assert_eq!(tokens_a.len(), tokens_b.len());

        let distinct_a: HashSet<&str> = tokens_a.iter().map(Token::text).collect();
        let distinct_b: HashSet<&str> = tokens_b.iter().map(Token::text).collect();
        let common = distinct_a.intersection(&distinct_b).count();

        distinct_a.len() >= self.min_match_length
            && ratio(common, distinct_a.len()) >= self.min_common_token
    }
}

fn extend(open: &mut Option<Candidate>, idx_a: usize, idx_b: usize) {
    match open {
        Some(run) => {
            debug_assert_eq!(run.a_start + run.len, idx_a);
            debug_assert_eq!(run.b_start + run.len, idx_b);
            run.len += 1;
        }
        None => {
            *open = Some(Candidate {
                a_start: idx_a,
                b_start: idx_b,
                len: 1,
            });
        }
    }
}

/// Longest first; a candidate is kept only if none of its tokens is already claimed on
/// either side. Ties keep discovery order.
fn select_disjoint(mut candidates: Vec<Candidate>, a_len: usize, b_len: usize) -> Vec<MatchRun> {
    candidates.sort_by(|x, y| y.len.cmp(&x.len));

    let mut claimed_a = vec![false; a_len];
    let mut claimed_b = vec![false; b_len];
    let mut out: Vec<MatchRun> = Vec::new();

    for run in candidates {
        if claimed_a[run.a_range()].iter().any(|&c| c) || claimed_b[run.b_range()].iter().any(|&c| c)
        {
            continue;
        }
        claimed_a[run.a_range()].fill(true);
        claimed_b[run.b_range()].fill(true);
        let index = out.len();
        out.push(MatchRun {
            a_start: run.a_start,
            b_start: run.b_start,
            len: run.len,
            index,
        });
    }

    out
}
