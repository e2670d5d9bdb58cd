//! Sequence-matching similarity ratio.
//!
//! Pure-Rust implementation of the classic "gestalt pattern matching"
//! ratio: find the longest common contiguous block, recurse on the pieces
//! to its left and right, and score `2·M / T` where `M` is the number of
//! matched characters and `T` the combined length of both inputs.
//!
//! The result depends on argument order. Callers compare
//! `ratio(query, candidate)` consistently.

use std::collections::HashMap;

/// Second sequences at least this long get the popular-element heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity of `a` and `b` in `[0.0, 1.0]`, computed over chars.
///
/// Two empty strings are identical (1.0); an empty string against a
/// non-empty one scores 0.0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = SequenceMatcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

/// Matching state for one `(a, b)` pair.
struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each char in `b`, ascending. Popular chars are absent.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // A char occurring in more than 1% of a long `b` is "popular" and
        // cannot seed a match, only extend one.
        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest block with `a[i..i+k] == b[j..j+k]` inside the given ranges.
    ///
    /// Among blocks of maximal length, returns the one starting earliest in
    /// `a`, then earliest in `b`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular chars never seed a match; let them extend one at either end.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    /// Total length of all matching blocks.
    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(approx(ratio("how to avoid burnout", "how to avoid burnout"), 1.0));
    }

    #[test]
    fn empty_inputs() {
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("", "abc"), 0.0));
        assert!(approx(ratio("abc", ""), 0.0));
    }

    #[test]
    fn reference_values() {
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        assert!(approx(ratio("hello", "hallo"), 0.8));
        assert!(approx(ratio("abc", "cba"), 1.0 / 3.0));
        assert!(approx(ratio("qabxcd", "abycdf"), 2.0 / 3.0));
        assert!(approx(ratio("café au lait", "cafe au lait"), 22.0 / 24.0));
    }

    #[test]
    fn argument_order_matters() {
        assert!(approx(ratio("tide", "diet"), 0.25));
        assert!(approx(ratio("diet", "tide"), 0.5));
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let first = ratio("tips for remote working", "tips for remote work");
        for _ in 0..10 {
            assert_eq!(ratio("tips for remote working", "tips for remote work"), first);
        }
    }

    #[test]
    fn matched_blocks_are_recursive() {
        // "ab" + "cd" around the inserted "x"
        let a: Vec<char> = "abxcd".chars().collect();
        let b: Vec<char> = "abcd".chars().collect();
        assert_eq!(SequenceMatcher::new(&a, &b).matched_len(), 4);
    }

    #[test]
    fn longest_match_prefers_earliest() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(m.find_longest_match(0, 4, 0, 2), (0, 0, 2));
    }

    #[test]
    fn popular_chars_only_extend_matches() {
        let long_a = "a".repeat(250);
        assert!(approx(ratio(&long_a, &long_a), 1.0));

        // 'a' is popular in b, so nothing can seed a match
        assert!(approx(ratio(&format!("b{long_a}"), &long_a), 0.0));
        assert!(approx(ratio(&format!("x{long_a}"), &long_a), 0.0));

        let a = format!("{}{}", "a".repeat(10), "b".repeat(300));
        let b = "ab".repeat(150);
        assert!(approx(ratio(&a, &b), 2.0 / 610.0));
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let samples = ["", "a", "ab", "abc abc", "the quick brown fox", "zzzz"];
        for x in samples {
            for y in samples {
                let r = ratio(x, y);
                assert!((0.0..=1.0).contains(&r), "ratio({x:?}, {y:?}) = {r}");
            }
        }
    }
}
