use crate::config::EngineConfig;
use crate::core::dataset::Dataset;
use crate::core::fusion::FusionEngine;
use crate::core::search::CandidateSearch;
use crate::core::syllable::{ItalianSyllabifier, Syllabifier};
use crate::core::types::{Outcome, Prompt, ThemeVariants};
use crate::error::{BlendError, Result};
use crate::persistence::{load_dataset, load_lexicon, load_overrides};
use crate::semantic::{EmbeddingExpander, SemanticExpander};
use crate::training::OverrideTable;
use std::sync::Arc;
use tracing::{debug, info, warn};

// The engine owns only read-only state. Cloning it is cheap and every clone
// can serve requests concurrently without locking.
#[derive(Clone)]
pub struct BlendEngine {
    dataset: Option<Arc<Dataset>>,
    overrides: Arc<OverrideTable>,
    expander: Arc<dyn SemanticExpander>,
    fusion: FusionEngine,
    parallel: bool,
}

impl BlendEngine {
    /// `dataset: None` makes every request answer [`Outcome::DataUnavailable`].
    pub fn new(
        dataset: Option<Dataset>,
        overrides: OverrideTable,
        expander: Arc<dyn SemanticExpander>,
        syllabifier: Arc<dyn Syllabifier>,
    ) -> Self {
        Self {
            dataset: dataset.map(Arc::new),
            overrides: Arc::new(overrides),
            expander,
            fusion: FusionEngine::new(syllabifier),
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Loads every data file named by the config. Must complete before the
    /// first request; nothing is reloaded afterwards.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let dataset = match load_dataset(&config.data.dataset) {
            Ok(dataset) => Some(dataset),
            Err(BlendError::DatasetMissing { path }) if !config.data.require_dataset => {
                warn!(path = %path.display(), "dataset missing, serving data unavailable");
                None
            }
            Err(e) => return Err(e),
        };
        let overrides = load_overrides(&config.data.overrides)?;
        let lexicon = load_lexicon(&config.data)?;

        let expander = EmbeddingExpander::new(lexicon.index, lexicon.lemmas, &config.expansion);
        let syllabifier = ItalianSyllabifier::new(config.syllables.min_edge);

        info!(parallel = config.search.parallel, "blend engine ready");
        Ok(Self::new(dataset, overrides, Arc::new(expander), Arc::new(syllabifier))
            .with_parallel(config.search.parallel))
    }

    pub fn theme_variants(&self, theme: &str) -> Option<ThemeVariants> {
        ThemeVariants::build(theme, self.expander.as_ref())
    }

    pub fn generate(&self, prompt: &Prompt) -> Outcome {
        let Some(dataset) = &self.dataset else {
            return Outcome::DataUnavailable;
        };

        // 1. Candidates of the requested category
        let candidates = dataset.names_in(&prompt.category);
        if candidates.is_empty() {
            return Outcome::CategoryNotFound {
                category: prompt.category.clone(),
            };
        }

        // 2. Literal lemma plus related lemmas
        let Some(themes) = self.theme_variants(&prompt.theme) else {
            return Outcome::NoMatch;
        };
        debug!(
            category = %prompt.category,
            candidates = candidates.len(),
            themes = ?themes.as_slice(),
            "searching"
        );

        // 3. Best blend over every candidate
        let search = CandidateSearch::new(&self.fusion, &self.overrides);
        let best = if self.parallel {
            search.search_parallel(&candidates, &themes)
        } else {
            search.search(&candidates, &themes)
        };

        match best {
            Some(found) => Outcome::Match(found),
            None => Outcome::NoMatch,
        }
    }

    /// Parses "<category> <theme...>" first. `None` means the text is malformed.
    pub fn generate_text(&self, text: &str) -> Option<Outcome> {
        Prompt::parse(text).map(|prompt| self.generate(&prompt))
    }
}
