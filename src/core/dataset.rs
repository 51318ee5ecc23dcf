// File: src/core/dataset.rs
use crate::core::types::CategoryRecord;

/// Category-tagged names, read-only after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CategoryRecord>,
}

impl Dataset {
    /// Records with a blank category or name are dropped.
    pub fn new(records: impl IntoIterator<Item = CategoryRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .filter(|r| !r.category.trim().is_empty() && !r.name.trim().is_empty())
                .collect(),
        }
    }

    /// Names whose category contains `category`, ignoring case, in dataset order.
    pub fn names_in(&self, category: &str) -> Vec<&str> {
        let needle = category.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.category.to_lowercase().contains(&needle))
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, name: &str) -> CategoryRecord {
        CategoryRecord {
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn category_filter_is_a_case_insensitive_substring_match() {
        let dataset = Dataset::new(vec![
            record("Film", "Il Gattopardo"),
            record("Serie TV", "La Casa di Carta"),
            record("Film d'animazione", "La Sirenetta"),
        ]);
        assert_eq!(dataset.names_in("film"), vec!["Il Gattopardo", "La Sirenetta"]);
        assert_eq!(dataset.names_in("SERIE"), vec!["La Casa di Carta"]);
        assert!(dataset.names_in("animale").is_empty());
    }

    #[test]
    fn blank_rows_are_dropped() {
        let dataset =
            Dataset::new(vec![record("Film", " "), record("", "Nome"), record("Film", "Ok")]);
        assert_eq!(dataset.len(), 1);
    }
}
