// File: src/semantic/embedding.rs
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Word vectors for nearest-neighbour lookup.
/// Vectors are stored L2-normalised in one flat buffer, so cosine similarity
/// is a plain dot product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingIndex {
    dim: usize,
    words: Vec<String>,
    vectors: Vec<f32>,
    /// Maps a lower-cased word to its row.
    rows: HashMap<String, usize>,
}

impl EmbeddingIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            words: Vec::new(),
            vectors: Vec::new(),
            rows: HashMap::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.rows.contains_key(&word.to_lowercase())
    }

    /// Adds a word. Returns false on a dimension mismatch or a repeated word;
    /// the first occurrence of a word is kept.
    pub fn insert(&mut self, word: &str, vector: &[f32]) -> bool {
        if vector.len() != self.dim {
            return false;
        }
        let key = word.to_lowercase();
        if self.rows.contains_key(&key) {
            return false;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            self.vectors.extend(vector.iter().map(|x| x / norm));
        } else {
            self.vectors.extend(std::iter::repeat(0.0).take(self.dim));
        }
        self.rows.insert(key, self.words.len());
        self.words.push(word.to_string());
        true
    }

    fn row(&self, idx: usize) -> &[f32] {
        &self.vectors[idx * self.dim..(idx + 1) * self.dim]
    }

    /// The `n` words closest to `word` by cosine similarity, closest first,
    /// ties broken by insertion order. The word itself is included.
    /// Unknown words and zero vectors have no neighbours.
    /// Complexity: O(V * d + V log V) for V words of dimension d.
    pub fn most_similar(&self, word: &str, n: usize) -> Vec<String> {
        let Some(&target) = self.rows.get(&word.to_lowercase()) else {
            return Vec::new();
        };
        let query = self.row(target);
        if query.iter().all(|&x| x == 0.0) {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = (0..self.words.len())
            .map(|idx| {
                let sim = self.row(idx).iter().zip(query).map(|(a, b)| a * b).sum::<f32>();
                (idx, sim)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .take(n)
            .map(|(idx, _)| self.words[idx].clone())
            .collect()
    }
}
