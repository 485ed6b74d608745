//! String similarity measures, each returning a score in 0-100.
//!
//! The base `ratio` is indel similarity: insertions and deletions only, no
//! substitutions, so `ratio = 100 * 2*LCS / (len_a + len_b)`. The three
//! derived ratios are complementary:
//! - `token_set_ratio` ignores token order and extraneous tokens,
//! - `token_sort_ratio` compares the full sorted token sequences,
//! - `partial_ratio` rewards one string being a substring of the other.

use std::collections::BTreeSet;

/// Plain sequence similarity: 100 * 2*LCS / (len_a + len_b).
pub fn ratio(a: &str, b: &str) -> f32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    ratio_chars(&a_chars, &b_chars)
}

/// Similarity of the two token sequences after sorting tokens.
///
/// Penalizes genuinely different word sets even when set overlap is high.
pub fn token_sort_ratio(a: &str, b: &str) -> f32 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Order-insensitive token-set overlap.
///
/// Builds the sorted intersection and the two sorted remainders, then takes
/// the best pairwise ratio. Robust to token reordering and to extraneous
/// tokens on either side.
pub fn token_set_ratio(a: &str, b: &str) -> f32 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 100.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let common: Vec<&str> = set_a.intersection(&set_b).copied().collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).copied().collect();

    let base = common.join(" ");
    let combined_a = join_nonempty(&base, &only_a.join(" "));
    let combined_b = join_nonempty(&base, &only_b.join(" "));

    ratio(&base, &combined_a)
        .max(ratio(&base, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

/// Best similarity of the shorter string against any same-length window of
/// the longer one. A sequel subtitle appended to an otherwise identical
/// title still scores high here.
pub fn partial_ratio(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    let window = shorter.len();
    let mut best = 0.0f32;
    for start in 0..=(longer.len() - window) {
        let slice = &longer[start..start + window];
        let score = ratio_chars(shorter, slice);
        if score > best {
            best = score;
        }
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn ratio_chars(a: &[char], b: &[char]) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let lcs = lcs_length(a, b);
    100.0 * (2.0 * lcs as f32) / (a.len() + b.len()) as f32
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_nonempty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{} {}", a, b),
    }
}

/// Length of the longest common subsequence of two char sequences.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for a_char in a {
        for (j, b_char) in b.iter().enumerate() {
            curr[j + 1] = if a_char == b_char {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
