//! Normalized string similarity used to reconcile records across providers.
//!
//! The default metric is the Ratcliff/Obershelp "gestalt pattern matching"
//! ratio: `2 * M / T`, where `T` is the total number of characters in both
//! strings and `M` the number of characters in matching blocks. Blocks are
//! found by recursively taking the longest common substring and repeating on
//! the unmatched pieces to its left and right. Ties between equally long
//! substrings go to the one starting earliest in the first string, then
//! earliest in the second, which makes the ratio deterministic but not
//! symmetric (`ratio("tide", "diet") == 0.25`, `ratio("diet", "tide") == 0.5`).
//!
//! Strings are compared as Unicode scalar values without any case folding.
//! Once the second string is 200 characters or longer, characters that make
//! up more than 1% of it (plus one) are treated as noise and never take part
//! in a match.

use std::{collections::HashMap, fmt, str::FromStr};

use clap::ValueEnum;

/// A deterministic similarity score in `[0, 1]`.
pub trait Similarity {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SimilarityMetric {
    /// Ratcliff/Obershelp ratio
    #[default]
    Gestalt,
    /// 1 - Levenshtein distance / length of the longer string
    Levenshtein,
    /// Jaro-Winkler similarity
    JaroWinkler,
}

impl Similarity for SimilarityMetric {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Gestalt => gestalt_ratio(a, b),
            SimilarityMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
            SimilarityMetric::JaroWinkler => strsim::jaro_winkler(a, b),
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s.trim(), true)
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimilarityMetric::Gestalt => "gestalt",
            SimilarityMetric::Levenshtein => "levenshtein",
            SimilarityMetric::JaroWinkler => "jaro-winkler",
        };
        f.write_str(name)
    }
}

/// Ratcliff/Obershelp similarity of `a` and `b`.
///
/// Two empty strings are identical and score `1.0`. Popular characters of a
/// long `b` are skipped, see the module docs.
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Length from which popular characters of `b` are ignored.
const POPULAR_MIN_LEN: usize = 200;

/// Per position of `b`, whether the character there may be matched.
fn matchable(b: &[char]) -> Vec<bool> {
    if b.len() < POPULAR_MIN_LEN {
        return vec![true; b.len()];
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in b {
        *counts.entry(*c).or_default() += 1;
    }
    let limit = b.len() / 100 + 1;
    b.iter().map(|c| counts[c] <= limit).collect()
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let usable = matchable(b);
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, &usable, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }

        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]` made of
/// matchable characters, as `(start_in_a, start_in_b, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    usable: &[bool],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);

    // run[col] is the length of the common suffix ending at a[i], b[blo + col - 1]
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut run = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if usable[j] && a[i] == b[j] {
                let k = prev[col - 1] + 1;
                run[col] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            } else {
                run[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    (best_i, best_j, best_k)
}
