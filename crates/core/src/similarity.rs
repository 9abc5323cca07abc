//! Character-level similarity scores on a 0-100 scale.
//!
//! `ratio` is the normalized indel similarity `2 * LCS / (len_a + len_b)`.
//! `partial_ratio` slides the shorter string over the longer one and keeps the
//! best `ratio`, which rewards a phrase that appears inside a longer line.

use std::collections::HashSet;

/// Normalized indel similarity of two char sequences.
pub fn ratio(left: &[char], right: &[char]) -> f64 {
    let total = left.len() + right.len();
    if total == 0 {
        return 100.0;
    }

    let common = longest_common_subsequence(left, right);
    200.0 * common as f64 / total as f64
}

/// Best `ratio` of the shorter string against any alignment on the longer one.
///
/// Alignments are every full-length window of the longer string plus its
/// prefixes and suffixes shorter than the shorter string.
pub fn partial_ratio(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    if left.is_empty() && right.is_empty() {
        return 100.0;
    }
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    if left.len() < right.len() {
        best_alignment(&left, &right)
    } else if left.len() > right.len() {
        best_alignment(&right, &left)
    } else {
        let forward = best_alignment(&left, &right);
        if forward >= 100.0 {
            forward
        } else {
            forward.max(best_alignment(&right, &left))
        }
    }
}

/// `partial_ratio` rounded half-to-even to a whole percentage.
pub fn partial_ratio_percent(left: &str, right: &str) -> u8 {
    partial_ratio(left, right).round_ties_even().clamp(0.0, 100.0) as u8
}

fn best_alignment(short: &[char], long: &[char]) -> f64 {
    let len = short.len();
    let alphabet: HashSet<char> = short.iter().copied().collect();

    // A window whose boundary char is absent from `short` never beats its
    // neighbour without that char, so only windows bounded by shared chars
    // are scored.
    let prefixes = (1..len)
        .filter(|&end| alphabet.contains(&long[end - 1]))
        .map(|end| &long[..end]);
    let windows = long
        .windows(len)
        .filter(|window| alphabet.contains(&window[len - 1]));
    let suffixes = (long.len() + 1 - len..long.len())
        .filter(|&start| alphabet.contains(&long[start]))
        .map(|start| &long[start..]);

    let mut best = 0.0f64;
    for window in prefixes.chain(windows).chain(suffixes) {
        let score = ratio(short, window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best
}

fn longest_common_subsequence(left: &[char], right: &[char]) -> usize {
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; right.len() + 1];
    let mut current = vec![0usize; right.len() + 1];

    for &left_char in left {
        for (column, &right_char) in right.iter().enumerate() {
            current[column + 1] = if left_char == right_char {
                previous[column] + 1
            } else {
                previous[column + 1].max(current[column])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}
