// File: src/core/fusion.rs
use crate::core::syllable::Syllabifier;
use crate::fuzzy::edit_distance;
use std::sync::Arc;

/// Overlaps shorter than this are not considered a fit.
const MIN_OVERLAP: usize = 2;

/// Blends two words into one upper-cased token.
///
/// Tries, in order: the longest suffix/prefix overlap between the words, a
/// syllable splice at the closest pair of syllables, and finally a fixed
/// half-plus-two-thirds cut when the splice collapses below the base length.
#[derive(Clone)]
pub struct FusionEngine {
    syllabifier: Arc<dyn Syllabifier>,
}

impl FusionEngine {
    pub fn new(syllabifier: Arc<dyn Syllabifier>) -> Self {
        Self { syllabifier }
    }

    /// Pure in its inputs and the syllabifier. An empty side yields the other
    /// side upper-cased.
    pub fn fuse(&self, base: &str, theme: &str) -> String {
        let base = base.to_lowercase();
        let theme = theme.to_lowercase();
        if theme.is_empty() {
            return base.to_uppercase();
        }
        if base.is_empty() {
            return theme.to_uppercase();
        }

        let b: Vec<char> = base.chars().collect();
        let t: Vec<char> = theme.chars().collect();

        // 1. Shared edge between the two words
        if let Some(blend) = overlap(&b, &t) {
            return blend.to_uppercase();
        }

        // 2. Replace the closest base syllable with the theme up to its match
        let spliced = self.splice(&base, &theme);

        // 3. Splices shorter than the base are discarded
        let blend = if spliced.chars().count() < b.len() {
            t[..t.len() / 2].iter().chain(&b[b.len() / 3..]).collect()
        } else {
            spliced
        };

        blend.to_uppercase()
    }

    fn splice(&self, base: &str, theme: &str) -> String {
        let s_base = non_empty(self.syllabifier.syllabify(base), base);
        let s_theme = non_empty(self.syllabifier.syllabify(theme), theme);

        // First pair at the minimum distance wins
        let mut best_dist = usize::MAX;
        let (mut idx_b, mut idx_t) = (0, 0);
        for (i, sil_b) in s_base.iter().enumerate() {
            for (j, sil_t) in s_theme.iter().enumerate() {
                let dist = edit_distance(sil_b, sil_t);
                if dist < best_dist {
                    best_dist = dist;
                    idx_b = i;
                    idx_t = j;
                }
            }
        }

        let mut blend = s_theme[..=idx_t].concat();
        blend.push_str(&s_base[idx_b + 1..].concat());
        blend
    }
}

/// Longest overlap of at least two characters. At equal length the theme's
/// tail running into the base's head is preferred.
fn overlap(base: &[char], theme: &[char]) -> Option<String> {
    let longest = base.len().min(theme.len());
    for i in (MIN_OVERLAP..=longest).rev() {
        if theme[theme.len() - i..] == base[..i] {
            return Some(theme.iter().chain(&base[i..]).collect());
        }
        if base[base.len() - i..] == theme[..i] {
            return Some(base.iter().chain(&theme[i..]).collect());
        }
    }
    None
}

fn non_empty(syllables: Vec<String>, word: &str) -> Vec<String> {
    if syllables.is_empty() {
        vec![word.to_string()]
    } else {
        syllables
    }
}
