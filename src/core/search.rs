// File: src/core/search.rs
use crate::core::fusion::FusionEngine;
use crate::core::types::{MatchResult, Score, ThemeVariants};
use crate::fuzzy::fuzzy_ratio;
use crate::training::{OverrideTable, OVERRIDE_SCORE};
use rayon::prelude::*;
use tracing::debug;

/// Pieces shorter than this (in characters) are never blended.
pub const MIN_PIECE_LEN: usize = 4;

/// Added when the theme ends with the piece's first two letters.
pub const PREFIX_BONUS: Score = 30;

/// Scans candidate names x pieces x theme variants and keeps the first
/// strictly-best blend.
pub struct CandidateSearch<'a> {
    fusion: &'a FusionEngine,
    overrides: &'a OverrideTable,
}

impl<'a> CandidateSearch<'a> {
    pub fn new(fusion: &'a FusionEngine, overrides: &'a OverrideTable) -> Self {
        Self { fusion, overrides }
    }

    /// Exhaustive scan in dataset order. Equal scores never replace the incumbent.
    /// Complexity: O(C * P * T) fusions for C names, P pieces, T variants.
    pub fn search<S: AsRef<str>>(
        &self,
        candidates: &[S],
        themes: &ThemeVariants,
    ) -> Option<MatchResult> {
        candidates
            .iter()
            .filter_map(|name| self.best_in_candidate(name.as_ref(), themes))
            .fold(None, keep_first_best)
    }

    /// Same result as [`search`](Self::search). Each candidate is scanned on the
    /// rayon pool, then the per-candidate winners are reduced in dataset order.
    pub fn search_parallel<S: AsRef<str> + Sync>(
        &self,
        candidates: &[S],
        themes: &ThemeVariants,
    ) -> Option<MatchResult> {
        let winners: Vec<Option<MatchResult>> = candidates
            .par_iter()
            .map(|name| self.best_in_candidate(name.as_ref(), themes))
            .collect();
        winners.into_iter().flatten().fold(None, keep_first_best)
    }

    fn best_in_candidate(&self, name: &str, themes: &ThemeVariants) -> Option<MatchResult> {
        let pieces: Vec<&str> = name.split_whitespace().collect();
        let mut best: Option<MatchResult> = None;

        for (i, piece) in pieces.iter().enumerate() {
            if piece.chars().count() < MIN_PIECE_LEN {
                continue;
            }
            for theme in themes.as_slice() {
                let (score, blend) = self.score_pair(piece, theme);
                if best.as_ref().map_or(true, |b| score > b.score) {
                    let mut output = pieces.clone();
                    output[i] = &blend;
                    best = Some(MatchResult {
                        output: output.join(" "),
                        original: name.to_string(),
                        info: MatchResult::annotate(theme, piece),
                        score,
                    });
                }
            }
        }
        best
    }

    /// Score and blend for one (piece, theme) pair. A curated blend skips the
    /// fusion engine entirely.
    pub fn score_pair(&self, piece: &str, theme: &str) -> (Score, String) {
        if let Some(curated) = self.overrides.lookup(piece, theme) {
            return (OVERRIDE_SCORE, curated);
        }

        let mut score = Score::from(fuzzy_ratio(piece, theme));
        if shares_hinge(theme, piece) {
            score += PREFIX_BONUS;
        }
        (score, self.fusion.fuse(piece, theme))
    }
}

fn keep_first_best(best: Option<MatchResult>, candidate: MatchResult) -> Option<MatchResult> {
    match best {
        Some(current) if candidate.score <= current.score => Some(current),
        _ => {
            debug!(output = %candidate.output, score = candidate.score, "new best blend");
            Some(candidate)
        }
    }
}

/// Whether the theme's last two letters equal the piece's first two, ignoring case.
fn shares_hinge(theme: &str, piece: &str) -> bool {
    let theme: Vec<char> = theme.to_lowercase().chars().collect();
    let piece: Vec<char> = piece.to_lowercase().chars().collect();
    theme.len() >= 2 && piece.len() >= 2 && theme[theme.len() - 2..] == piece[..2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::syllable::ItalianSyllabifier;
    use crate::core::types::OverrideEntry;
    use std::sync::Arc;

    fn fusion() -> FusionEngine {
        FusionEngine::new(Arc::new(ItalianSyllabifier::default()))
    }

    fn themes(words: &[&str]) -> ThemeVariants {
        ThemeVariants::new(words[0], words[1..].iter().map(|w| w.to_string())).unwrap()
    }

    #[test]
    fn hinge_bonus_ignores_case() {
        assert!(shares_hinge("luna", "Nave"));
        assert!(!shares_hinge("luna", "volpe"));
        assert!(!shares_hinge("a", "abcd"));
    }

    #[test]
    fn score_adds_hinge_bonus_to_ratio() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        // LCS("nave", "luna") = "na" -> 50, plus 30
        let (score, blend) = search.score_pair("Nave", "luna");
        assert_eq!(score, 80);
        assert_eq!(blend, "LUNAVE");
    }

    #[test]
    fn picks_the_highest_scoring_piece() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        let best = search
            .search(&["La Volpe Nave", "Il Gatto"], &themes(&["luna"]))
            .unwrap();
        assert_eq!(best.original, "La Volpe Nave");
        assert_eq!(best.output, "La Volpe LUNAVE");
        assert_eq!(best.info, "'luna' + 'Nave'");
        assert_eq!(best.score, 80);
    }

    #[test]
    fn ties_keep_the_first_encountered_pair() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        let best = search.search(&["Ramo", "Ramo Secco"], &themes(&["ramo"])).unwrap();
        assert_eq!(best.original, "Ramo");
        assert_eq!(best.score, 100);
    }

    #[test]
    fn earlier_theme_variant_wins_ties() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        let best = search.search(&["Sole"], &themes(&["sale", "sole", "SOLE"])).unwrap();
        assert_eq!(best.info, "'sole' + 'Sole'");
        assert_eq!(best.score, 100);
    }

    #[test]
    fn short_pieces_are_never_substituted() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        assert_eq!(search.search(&["Il Re", "La Era"], &themes(&["luna"])), None);

        let best = search.search(&["Il Re di Roma"], &themes(&["il"])).unwrap();
        assert_eq!(best.info, "'il' + 'Roma'");
        assert!(best.output.starts_with("Il Re di "));
    }

    #[test]
    fn empty_candidate_list_has_no_match() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        let empty: [&str; 0] = [];
        assert_eq!(search.search(&empty, &themes(&["luna"])), None);
    }

    #[test]
    fn override_beats_exact_match_elsewhere() {
        let fusion = fusion();
        let overrides = OverrideTable::from_entries(vec![OverrideEntry {
            base: "volpe".to_string(),
            theme: "luna".to_string(),
            result: "VOLUNA".to_string(),
        }]);
        let search = CandidateSearch::new(&fusion, &overrides);
        let best = search
            .search(&["Luna Rossa", "La Volpe Grigia"], &themes(&["luna"]))
            .unwrap();
        assert_eq!(best.output, "La VOLUNA Grigia");
        assert_eq!(best.score, OVERRIDE_SCORE);
    }

    #[test]
    fn output_keeps_piece_count_and_order() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        let best = search
            .search(&["Il   Gatto con gli Stivali"], &themes(&["topo"]))
            .unwrap();
        let before: Vec<&str> = best.original.split_whitespace().collect();
        let after: Vec<&str> = best.output.split(' ').collect();
        assert_eq!(before.len(), after.len());
        assert_eq!(before.iter().zip(&after).filter(|(a, b)| a != b).count(), 1);
        assert_eq!(best.output, "Il GATTOPO con gli Stivali");
    }

    #[test]
    fn parallel_scan_matches_sequential_scan() {
        let fusion = fusion();
        let overrides = OverrideTable::new();
        let search = CandidateSearch::new(&fusion, &overrides);
        let names = [
            "Ramo Secco",
            "Ramo Verde",
            "La Volpe Nave",
            "Nave Nave",
            "Il Gatto con gli Stivali",
        ];
        let variants = themes(&["luna", "ramo", "topo"]);
        assert_eq!(search.search(&names, &variants), search.search_parallel(&names, &variants));
    }
}
