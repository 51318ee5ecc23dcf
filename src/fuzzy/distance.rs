// File: src/fuzzy/distance.rs
//! Case-insensitive string distance and similarity primitives.

/// Levenshtein distance between two words, ignoring case.
/// Counts Unicode scalar values, not bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Normalized similarity in `0..=100`, ignoring case.
///
/// This is the indel ratio: `(|a| + |b| - indel) / (|a| + |b|)` scaled to 100,
/// where `indel` counts only insertions and deletions. It equals
/// `2 * LCS / (|a| + |b|)`. Ties at .5 round to even.
/// Complexity: O(|a| * |b|) time, O(|b|) space.
pub fn fuzzy_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    let numerator = 200 * longest_common_subsequence(&a, &b);
    round_half_even(numerator, total) as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

fn round_half_even(numerator: usize, denominator: usize) -> usize {
    let quotient = numerator / denominator;
    let twice_rem = 2 * (numerator % denominator);
    if twice_rem > denominator || (twice_rem == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
