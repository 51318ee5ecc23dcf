// File: src/semantic/lemma.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inflected form -> lemma. Unknown forms are their own lemma.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LemmaTable {
    forms: HashMap<String, String>,
}

impl LemmaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, form: &str, lemma: &str) {
        self.forms
            .entry(form.to_lowercase())
            .or_insert_with(|| lemma.to_lowercase());
    }

    pub fn lemma(&self, word: &str) -> String {
        let word = word.to_lowercase();
        self.forms.get(&word).cloned().unwrap_or(word)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
