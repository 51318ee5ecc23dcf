//! Theme expansion: lemmatisation plus related words from word embeddings.

pub mod embedding;
pub mod lemma;

pub use embedding::EmbeddingIndex;
pub use lemma::LemmaTable;

use crate::config::ExpansionConfig;
use crate::fuzzy::edit_distance;

/// Produces the lemma of a word and related lemmas for a theme phrase.
pub trait SemanticExpander: Send + Sync {
    fn lemma(&self, word: &str) -> String;

    /// Related lemmas in relevance order. May be empty.
    fn expand(&self, theme: &str) -> Vec<String>;
}

/// Lower-cases words and never expands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExpansion;

impl SemanticExpander for NoExpansion {
    fn lemma(&self, word: &str) -> String {
        word.to_lowercase()
    }

    fn expand(&self, _theme: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Nearest neighbours of the theme's first word, kept only when alphabetic and
/// far enough (edit distance) from the literal theme to be a different word.
pub struct EmbeddingExpander {
    index: Option<EmbeddingIndex>,
    lemmas: LemmaTable,
    neighbors: usize,
    max_related: usize,
    min_distance: usize,
}

impl EmbeddingExpander {
    pub fn new(
        index: Option<EmbeddingIndex>,
        lemmas: LemmaTable,
        settings: &ExpansionConfig,
    ) -> Self {
        Self {
            index,
            lemmas,
            neighbors: settings.neighbors,
            max_related: settings.max_related,
            min_distance: settings.min_distance,
        }
    }
}

impl SemanticExpander for EmbeddingExpander {
    fn lemma(&self, word: &str) -> String {
        self.lemmas.lemma(word)
    }

    fn expand(&self, theme: &str) -> Vec<String> {
        let (Some(index), Some(head)) = (&self.index, theme.split_whitespace().next()) else {
            return Vec::new();
        };
        let literal = theme.trim().to_lowercase();

        let mut related = Vec::new();
        for word in index.most_similar(head, self.neighbors) {
            if related.len() == self.max_related {
                break;
            }
            let word = word.to_lowercase();
            if word.is_empty() || !word.chars().all(char::is_alphabetic) {
                continue;
            }
            if edit_distance(&word, &literal) > self.min_distance {
                related.push(self.lemma(&word));
            }
        }
        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander(index: Option<EmbeddingIndex>) -> EmbeddingExpander {
        let mut lemmas = LemmaTable::new();
        lemmas.insert("stelle", "stella");
        lemmas.insert("lune", "luna");
        EmbeddingExpander::new(index, lemmas, &ExpansionConfig::default())
    }

    fn sky() -> EmbeddingIndex {
        let mut index = EmbeddingIndex::new(2);
        index.insert("lune", &[1.0, 0.0]);
        index.insert("luna", &[1.0, 0.05]);
        index.insert("stelle", &[1.0, 0.1]);
        index.insert("lunare", &[1.0, 0.15]);
        index.insert("cielo-blu", &[1.0, 0.2]);
        index.insert("firmamento", &[1.0, 0.25]);
        index.insert("pianeta", &[1.0, 0.3]);
        index
    }

    #[test]
    fn filters_near_duplicates_and_non_alphabetic_words() {
        // "lune" itself, "luna" and "lunare" are within distance 3 of the theme
        assert_eq!(expander(Some(sky())).expand("lune"), vec!["stella", "firmamento"]);
    }

    #[test]
    fn caps_related_words() {
        let mut index = EmbeddingIndex::new(1);
        let words = [
            "mare", "oceano", "spiaggia", "conchiglia", "gabbiano", "marinaio", "scogliera",
        ];
        for word in words {
            index.insert(word, &[1.0]);
        }
        let settings = ExpansionConfig {
            neighbors: 10,
            ..ExpansionConfig::default()
        };
        let expander = EmbeddingExpander::new(Some(index), LemmaTable::new(), &settings);
        assert_eq!(expander.expand("mare").len(), settings.max_related);
    }

    #[test]
    fn no_index_means_no_expansion() {
        assert!(expander(None).expand("luna").is_empty());
        assert_eq!(expander(None).lemma("Lune"), "luna");
    }

    #[test]
    fn unknown_theme_means_no_expansion() {
        assert!(expander(Some(sky())).expand("marte rosso").is_empty());
    }
}
