// src/core/types.rs
use crate::semantic::SemanticExpander;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score of a (piece, theme) pair. Fuzzy scores live in `0..=130`,
/// overrides score [`OVERRIDE_SCORE`](crate::training::OVERRIDE_SCORE).
pub type Score = u32;

/// One row of the category dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(rename = "Categoria", alias = "category", alias = "categoria")]
    pub category: String,
    /// Space-separated pieces, e.g. "Il Nome della Rosa".
    #[serde(rename = "Nome", alias = "name", alias = "nome")]
    pub name: String,
}

/// A curated exact-match blend, keyed case-insensitively on (base, theme).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub base: String,
    #[serde(alias = "tema")]
    pub theme: String,
    #[serde(alias = "risultato")]
    pub result: String,
}

/// Ordered theme variants. Index 0 is always the lemma of the literal theme,
/// the rest are related lemmas in expansion order. Order decides ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeVariants(Vec<String>);

impl ThemeVariants {
    /// Builds the list from a literal lemma plus related lemmas.
    /// Empty strings are dropped; `None` if the literal lemma itself is empty.
    pub fn new(lemma: &str, related: impl IntoIterator<Item = String>) -> Option<Self> {
        let lemma = lemma.trim();
        if lemma.is_empty() {
            return None;
        }
        let mut variants = vec![lemma.to_string()];
        variants.extend(related.into_iter().filter(|w| !w.trim().is_empty()));
        Some(Self(variants))
    }

    /// Lemma of the first token of `phrase`, followed by its expansion.
    pub fn build(phrase: &str, expander: &dyn SemanticExpander) -> Option<Self> {
        let phrase = phrase.trim().to_lowercase();
        let head = phrase.split_whitespace().next()?;
        Self::new(&expander.lemma(head), expander.expand(&phrase))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The winning blend of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Candidate name with exactly one piece replaced by the fused word.
    pub output: String,
    /// The untouched candidate name.
    pub original: String,
    /// "'theme' + 'piece'" annotation.
    pub info: String,
    pub score: Score,
}

impl MatchResult {
    pub fn annotate(theme: &str, piece: &str) -> String {
        format!("'{}' + '{}'", theme, piece)
    }
}

/// A request of the shape "<category> <theme...>".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub category: String,
    pub theme: String,
}

impl Prompt {
    /// Splits off the first token as the category; the rest is the theme phrase.
    /// Returns `None` when there are fewer than two tokens.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (category, theme) = text.split_once(char::is_whitespace)?;
        let theme = theme.trim();
        if category.is_empty() || theme.is_empty() {
            return None;
        }
        Some(Self {
            category: category.to_string(),
            theme: theme.to_string(),
        })
    }
}

/// Result of one request. Every failure mode stays distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Match(MatchResult),
    CategoryNotFound { category: String },
    NoMatch,
    DataUnavailable,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Match(m) => write!(
                f,
                "{} (from \"{}\", {}, score {})",
                m.output, m.original, m.info, m.score
            ),
            Outcome::CategoryNotFound { category } => write!(f, "category not found: {}", category),
            Outcome::NoMatch => write!(f, "no match found"),
            Outcome::DataUnavailable => write!(f, "dataset unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::NoExpansion;

    #[test]
    fn prompt_splits_category_from_theme_phrase() {
        let prompt = Prompt::parse("  film   luna piena ").unwrap();
        assert_eq!(prompt.category, "film");
        assert_eq!(prompt.theme, "luna piena");
    }

    #[test]
    fn prompt_needs_two_tokens() {
        assert_eq!(Prompt::parse("film"), None);
        assert_eq!(Prompt::parse("   "), None);
        assert_eq!(Prompt::parse(""), None);
    }

    #[test]
    fn literal_lemma_survives_empty_expansion() {
        let variants = ThemeVariants::build("Luna piena", &NoExpansion).unwrap();
        assert_eq!(variants.as_slice(), &["luna".to_string()]);
        assert!(!variants.is_empty());
    }

    #[test]
    fn empty_related_words_are_dropped() {
        let related = vec!["onda".to_string(), " ".to_string(), "spiaggia".to_string()];
        let variants = ThemeVariants::new("mare", related).unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants.as_slice()[2], "spiaggia");
    }

    #[test]
    fn info_renders_theme_then_piece() {
        assert_eq!(MatchResult::annotate("luna", "Volpe"), "'luna' + 'Volpe'");
    }
}
