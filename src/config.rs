//! Engine configuration.
//!
//! Every field has a default, so an absent or partial TOML file is fine.
//! Scoring constants are not configurable.

use crate::error::{BlendError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data: DataConfig,
    pub expansion: ExpansionConfig,
    pub syllables: SyllableConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV with `Categoria`,`Nome` columns.
    pub dataset: PathBuf,
    /// CSV with `base`,`theme`,`result` columns. Optional.
    pub overrides: PathBuf,
    /// TSV of `form<TAB>lemma`.
    pub lemmas: Option<PathBuf>,
    /// Word vectors in word2vec text format.
    pub embeddings: Option<PathBuf>,
    /// Bincode snapshot of the parsed embeddings.
    pub model_cache: Option<PathBuf>,
    /// Fail at startup when the dataset is missing, instead of answering
    /// "data unavailable" per request.
    pub require_dataset: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("nomi.csv"),
            overrides: PathBuf::from("training.csv"),
            lemmas: None,
            embeddings: None,
            model_cache: None,
            require_dataset: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Nearest neighbours requested from the embedding index.
    pub neighbors: usize,
    /// Most related lemmas kept after filtering.
    pub max_related: usize,
    /// A neighbour must be strictly farther than this from the theme.
    pub min_distance: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            neighbors: 6,
            max_related: 5,
            min_distance: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyllableConfig {
    /// Shortest first/last syllable the splitter will produce.
    pub min_edge: usize,
}

impl Default for SyllableConfig {
    fn default() -> Self {
        Self {
            min_edge: crate::core::syllable::DEFAULT_MIN_EDGE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Scan candidates on the rayon pool.
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BlendError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| BlendError::io(path, e))?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.expansion.max_related > self.expansion.neighbors {
            return Err(BlendError::config(format!(
                "expansion.max_related ({}) exceeds expansion.neighbors ({})",
                self.expansion.max_related, self.expansion.neighbors
            )));
        }
        if self.syllables.min_edge == 0 {
            return Err(BlendError::config("syllables.min_edge must be at least 1"));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BlendError::config(e.to_string()))
    }
}
