use crate::core::ColumnSet;

/// Case-insensitive substring search over the searchable columns.
///
/// A term whose trimmed length is below `min_len` disables filtering
/// entirely, so one- and two-letter queries show the whole collection.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    needle: Option<String>,
}

impl SearchFilter {
    pub fn new(term: &str, min_len: usize) -> Self {
        let trimmed = term.trim().to_lowercase();
        let needle = if trimmed.is_empty() || trimmed.chars().count() < min_len {
            None
        } else {
            Some(trimmed)
        };
        Self { needle }
    }

    pub fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    pub fn matches<R>(&self, record: &R, columns: &ColumnSet<R>) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        columns.searchable().any(|col| {
            col.value(record)
                .search_text()
                .is_some_and(|text| text.contains(needle.as_str()))
        })
    }

    /// Keeps collection order.
    pub fn apply<'r, R>(&self, records: &'r [R], columns: &ColumnSet<R>) -> Vec<&'r R> {
        records
            .iter()
            .filter(|record| self.matches(*record, columns))
            .collect()
    }

    pub fn count<R>(&self, records: &[R], columns: &ColumnSet<R>) -> usize {
        if !self.is_active() {
            return records.len();
        }
        records
            .iter()
            .filter(|record| self.matches(*record, columns))
            .count()
    }
}
