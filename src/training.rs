// File: src/training.rs
use crate::core::types::{OverrideEntry, Score};
use std::collections::HashMap;

/// Score given to a curated blend. Fuzzy scores top out at 100 + 30.
pub const OVERRIDE_SCORE: Score = 200;

/// Curated (base, theme) -> blend exceptions that bypass the fusion engine.
/// Keys are compared case-insensitively; the first row for a key wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<(String, String), String>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = OverrideEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Adds a row unless the key is already present. Returns whether it was added.
    pub fn insert(&mut self, entry: OverrideEntry) -> bool {
        let key = (entry.base.to_lowercase(), entry.theme.to_lowercase());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry.result);
        true
    }

    /// Exact case-insensitive lookup. The stored blend comes back upper-cased.
    pub fn lookup(&self, base: &str, theme: &str) -> Option<String> {
        self.entries
            .get(&(base.to_lowercase(), theme.to_lowercase()))
            .map(|result| result.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(base: &str, theme: &str, result: &str) -> OverrideEntry {
        OverrideEntry {
            base: base.to_string(),
            theme: theme.to_string(),
            result: result.to_string(),
        }
    }

    #[test]
    fn lookup_is_case_insensitive_on_both_keys() {
        let table = OverrideTable::from_entries(vec![row("volpe", "luna", "VOLUNA")]);
        assert_eq!(table.lookup("Volpe", "LUNA").as_deref(), Some("VOLUNA"));
        assert_eq!(table.lookup("volpe", "sole"), None);
        assert_eq!(table.lookup("luna", "volpe"), None);
    }

    #[test]
    fn first_row_for_a_key_wins() {
        let mut table = OverrideTable::new();
        assert!(table.insert(row("mare", "sole", "MARESOLE")));
        assert!(!table.insert(row("MARE", "Sole", "SOLEMARE")));
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("mare", "sole").as_deref(), Some("MARESOLE"));
    }

    #[test]
    fn stored_result_is_upper_cased() {
        let table = OverrideTable::from_entries(vec![row("gatto", "topo", "Gattopo")]);
        assert_eq!(table.lookup("gatto", "topo").as_deref(), Some("GATTOPO"));
    }

    #[test]
    fn override_outranks_any_fuzzy_score() {
        assert!(OVERRIDE_SCORE > 100 + 30);
    }
}
