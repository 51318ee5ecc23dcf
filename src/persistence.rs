// File: src/persistence.rs
//! Loading of the read-only data files, and the bincode lexicon snapshot.

use crate::config::DataConfig;
use crate::core::dataset::Dataset;
use crate::core::types::{CategoryRecord, OverrideEntry};
use crate::error::{BlendError, Result};
use crate::semantic::{EmbeddingIndex, LemmaTable};
use crate::training::OverrideTable;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Lemmas plus word vectors. Parsing the vector text is slow, so the parsed
/// form is cached as a bincode snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    pub index: Option<EmbeddingIndex>,
    pub lemmas: LemmaTable,
    /// The files this lexicon was built from, as they were at build time.
    pub sources: Vec<SourceStamp>,
}

/// Identity of a source file: path, size and modification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStamp {
    pub path: PathBuf,
    pub len: u64,
    pub modified: SystemTime,
}

impl SourceStamp {
    pub fn of(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| BlendError::io(path, e))?;
        let modified = meta.modified().map_err(|e| BlendError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified,
        })
    }
}

fn csv_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| BlendError::data(path, e.to_string()))
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(BlendError::DatasetMissing {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv_reader(path)?;
    let records = reader
        .deserialize::<CategoryRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| BlendError::data(path, e.to_string()))?;

    let dataset = Dataset::new(records);
    info!(path = %path.display(), records = dataset.len(), "dataset loaded");
    Ok(dataset)
}

/// A missing override file is an empty table, not an error.
pub fn load_overrides(path: &Path) -> Result<OverrideTable> {
    if !path.exists() {
        info!(path = %path.display(), "no override table, continuing without one");
        return Ok(OverrideTable::new());
    }
    let mut reader = csv_reader(path)?;
    let mut table = OverrideTable::new();
    for row in reader.deserialize::<OverrideEntry>() {
        let entry = row.map_err(|e| BlendError::data(path, e.to_string()))?;
        if !table.insert(entry) {
            debug!(path = %path.display(), "duplicate override key ignored");
        }
    }
    info!(path = %path.display(), entries = table.len(), "override table loaded");
    Ok(table)
}

/// `form<TAB>lemma` per line. Blank lines and `#` comments are skipped.
pub fn load_lemmas(path: &Path) -> Result<LemmaTable> {
    let file = File::open(path).map_err(|e| BlendError::io(path, e))?;
    let mut table = LemmaTable::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| BlendError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('\t') {
            Some((form, lemma)) if !form.trim().is_empty() && !lemma.trim().is_empty() => {
                table.insert(form.trim(), lemma.trim())
            }
            _ => warn!(path = %path.display(), line = lineno + 1, "skipping malformed lemma row"),
        }
    }
    info!(path = %path.display(), forms = table.len(), "lemma table loaded");
    Ok(table)
}

/// word2vec text format: an optional `count dim` header, then
/// `word v1 v2 ... vd` per line. Rows of the wrong width are skipped.
pub fn load_embeddings(path: &Path) -> Result<EmbeddingIndex> {
    let file = File::open(path).map_err(|e| BlendError::io(path, e))?;
    let mut index: Option<EmbeddingIndex> = None;
    let mut skipped = 0usize;

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| BlendError::io(path, e))?;
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };
        let values: Vec<&str> = fields.collect();

        if lineno == 0 && values.len() == 1 {
            if let (Ok(_), Ok(dim)) = (word.parse::<usize>(), values[0].parse::<usize>()) {
                index = Some(EmbeddingIndex::new(dim));
                continue;
            }
        }

        let vector: std::result::Result<Vec<f32>, _> =
            values.iter().map(|v| v.parse::<f32>()).collect();
        let Ok(vector) = vector else {
            skipped += 1;
            continue;
        };
        let index = index.get_or_insert_with(|| EmbeddingIndex::new(vector.len()));
        if !index.insert(word, &vector) {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped unusable embedding rows");
    }
    match index {
        Some(index) if !index.is_empty() => {
            info!(
                path = %path.display(),
                words = index.len(),
                dim = index.dim(),
                "embeddings loaded"
            );
            Ok(index)
        }
        _ => Err(BlendError::data(path, "no word vectors found")),
    }
}

pub fn save_to_disk(lexicon: &Lexicon, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| BlendError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| BlendError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, lexicon).map_err(BlendError::snapshot)?;
        writer.flush().map_err(|e| BlendError::io(path, e))?;
    }

    temp_file.persist(path).map_err(|e| BlendError::io(path, e.error))?;
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<Lexicon> {
    let file = File::open(path).map_err(|e| BlendError::io(path, e))?;
    let reader = BufReader::new(file);
    bincode::deserialize_from(reader).map_err(BlendError::snapshot)
}

/// Stamps for every configured source. `None` when one of them is missing
/// or unreadable, so no snapshot can be trusted.
fn stamp_sources(sources: &[&Path]) -> Option<Vec<SourceStamp>> {
    sources.iter().map(|path| SourceStamp::of(path).ok()).collect()
}

/// Loads lemmas and embeddings, preferring a snapshot built from exactly the
/// configured files. A snapshot that fails to decode or was built from other
/// files is rebuilt; a snapshot that fails to save only warns.
pub fn load_lexicon(config: &DataConfig) -> Result<Lexicon> {
    let sources: Vec<&Path> = config
        .lemmas
        .iter()
        .chain(config.embeddings.iter())
        .map(|p| p.as_path())
        .collect();

    if sources.is_empty() {
        return Ok(Lexicon::default());
    }
    let stamps = stamp_sources(&sources);

    if let (Some(cache), Some(stamps)) = (&config.model_cache, &stamps) {
        if cache.exists() {
            match load_from_disk(cache) {
                Ok(lexicon) if lexicon.sources == *stamps => {
                    info!(path = %cache.display(), "lexicon snapshot loaded");
                    return Ok(lexicon);
                }
                Ok(_) => info!(path = %cache.display(), "snapshot built from other sources"),
                Err(e) => {
                    warn!(path = %cache.display(), error = %e, "ignoring unreadable snapshot")
                }
            }
        }
    }

    let lemmas = match &config.lemmas {
        Some(path) => load_lemmas(path)?,
        None => LemmaTable::new(),
    };
    let index = config.embeddings.as_deref().map(load_embeddings).transpose()?;
    let lexicon = Lexicon {
        index,
        lemmas,
        sources: stamps.unwrap_or_default(),
    };

    if let Some(cache) = &config.model_cache {
        match save_to_disk(&lexicon, cache) {
            Ok(()) => info!(path = %cache.display(), "lexicon snapshot written"),
            Err(e) => warn!(path = %cache.display(), error = %e, "could not write snapshot"),
        }
    }
    Ok(lexicon)
}
