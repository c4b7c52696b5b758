// ============================================================================
// src/view/sort.rs - Column Sorting
// ============================================================================
//
// Design Patterns:
// - Comparator Pattern: the column's own comparator, or Value::sort_cmp
// - Strategy Pattern: configurable NULL placement and sort direction
//
// Features:
// - Stable sort (rows with equal keys keep their fetched order)
// - NULLS LAST for ASC, NULLS FIRST for DESC
// - Sorts borrowed rows, the cached collection is never reordered
//
// ============================================================================

use std::cmp::Ordering;

use crate::core::{Column, ColumnSet, DashboardError, Result, Value};

use super::query::SortDirection;

// ============================================================================
// NULL HANDLING STRATEGY
// ============================================================================

/// Where NULL cells go relative to populated ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    NullsFirst,
    NullsLast,
}

impl NullOrdering {
    /// - ASC → NULLS LAST
    /// - DESC → NULLS FIRST
    pub fn default_for_direction(direction: SortDirection) -> Self {
        if direction.is_descending() {
            Self::NullsFirst
        } else {
            Self::NullsLast
        }
    }
}

// ============================================================================
// SORT KEY
// ============================================================================

#[derive(Debug, Clone)]
pub struct SortKey {
    /// Column key to sort by
    pub column: String,
    pub direction: SortDirection,
    pub null_ordering: NullOrdering,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
            null_ordering: NullOrdering::default_for_direction(direction),
        }
    }

    pub fn with_null_ordering(
        column: impl Into<String>,
        direction: SortDirection,
        null_ordering: NullOrdering,
    ) -> Self {
        Self {
            column: column.into(),
            direction,
            null_ordering,
        }
    }
}

// ============================================================================
// ROW COMPARATOR
// ============================================================================

pub struct RowComparator<'a, R> {
    key: &'a SortKey,
    column: &'a Column<R>,
}

impl<'a, R> RowComparator<'a, R> {
    pub fn new(key: &'a SortKey, columns: &'a ColumnSet<R>) -> Result<Self> {
        let column = columns
            .get_column(&key.column)
            .filter(|col| col.sortable)
            .ok_or_else(|| DashboardError::ColumnNotFound(key.column.clone()))?;
        Ok(Self { key, column })
    }

    pub fn compare(&self, row1: &R, row2: &R) -> Ordering {
        let value1 = self.column.value(row1);
        let value2 = self.column.value(row2);
        self.compare_values(&value1, &value2)
    }

    fn compare_values(&self, value1: &Value, value2: &Value) -> Ordering {
        match (value1.is_null(), value2.is_null()) {
            // NULL placement does not flip with direction
            (true, true) => Ordering::Equal,
            (true, false) => match self.key.null_ordering {
                NullOrdering::NullsFirst => Ordering::Less,
                NullOrdering::NullsLast => Ordering::Greater,
            },
            (false, true) => match self.key.null_ordering {
                NullOrdering::NullsFirst => Ordering::Greater,
                NullOrdering::NullsLast => Ordering::Less,
            },
            (false, false) => {
                let ordering = self.column.compare(value1, value2);
                if self.key.direction.is_descending() {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
        }
    }
}

// ============================================================================
// SORT EXECUTOR
// ============================================================================

pub struct SortExecutor;

impl SortExecutor {
    /// Sorts rows in place by one column.
    ///
    /// # Returns
    /// * `Err(DashboardError::ColumnNotFound)` if the key names no sortable column
    pub fn sort<R>(rows: &mut [&R], key: &SortKey, columns: &ColumnSet<R>) -> Result<()> {
        let comparator = RowComparator::new(key, columns)?;
        if rows.len() < 2 {
            return Ok(());
        }

        // slice::sort_by is stable
        rows.sort_by(|row1, row2| comparator.compare(row1, row2));
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: i64,
        name: &'static str,
        price: Option<f64>,
    }

    fn columns() -> ColumnSet<Item> {
        ColumnSet::new(vec![
            Column::new("id", "ID", DataType::Integer, |i: &Item| Value::Integer(i.id)),
            Column::new("name", "Name", DataType::Text, |i: &Item| Value::from(i.name)),
            Column::new("price", "Price", DataType::Float, |i: &Item| Value::from(i.price)),
            Column::new("notes", "Notes", DataType::Text, |_: &Item| Value::Null).unsortable(),
        ])
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: 1, name: "banana", price: Some(10.0) },
            Item { id: 2, name: "Apple", price: None },
            Item { id: 3, name: "cherry", price: Some(2.5) },
            Item { id: 4, name: "apple", price: Some(10.0) },
        ]
    }

    fn ids(rows: &[&Item]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_null_ordering_defaults() {
        assert_eq!(
            NullOrdering::default_for_direction(SortDirection::Ascending),
            NullOrdering::NullsLast
        );
        assert_eq!(
            NullOrdering::default_for_direction(SortDirection::Descending),
            NullOrdering::NullsFirst
        );
    }

    #[test]
    fn test_numeric_ascending_nulls_last_and_stable() {
        let data = items();
        let mut rows: Vec<&Item> = data.iter().collect();
        SortExecutor::sort(&mut rows, &SortKey::new("price", SortDirection::Ascending), &columns())
            .unwrap();
        // 1 and 4 tie on 10.0 and keep fetched order
        assert_eq!(ids(&rows), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_numeric_descending_nulls_first() {
        let data = items();
        let mut rows: Vec<&Item> = data.iter().collect();
        SortExecutor::sort(&mut rows, &SortKey::new("price", SortDirection::Descending), &columns())
            .unwrap();
        assert_eq!(ids(&rows), vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive_and_stable() {
        let data = items();
        let mut rows: Vec<&Item> = data.iter().collect();
        SortExecutor::sort(&mut rows, &SortKey::new("name", SortDirection::Ascending), &columns())
            .unwrap();
        assert_eq!(ids(&rows), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let data = items();
        let key = SortKey::new("name", SortDirection::Descending);
        let mut once: Vec<&Item> = data.iter().collect();
        SortExecutor::sort(&mut once, &key, &columns()).unwrap();
        let mut twice = once.clone();
        SortExecutor::sort(&mut twice, &key, &columns()).unwrap();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_unknown_or_unsortable_column() {
        let data = items();
        let mut rows: Vec<&Item> = data.iter().collect();
        let err = SortExecutor::sort(&mut rows, &SortKey::new("nope", SortDirection::Ascending), &columns());
        assert!(matches!(err, Err(DashboardError::ColumnNotFound(k)) if k == "nope"));

        let err = SortExecutor::sort(&mut rows, &SortKey::new("notes", SortDirection::Ascending), &columns());
        assert!(matches!(err, Err(DashboardError::ColumnNotFound(_))));
    }

    #[test]
    fn test_custom_null_ordering() {
        let data = items();
        let mut rows: Vec<&Item> = data.iter().collect();
        let key = SortKey::with_null_ordering("price", SortDirection::Ascending, NullOrdering::NullsFirst);
        SortExecutor::sort(&mut rows, &key, &columns()).unwrap();
        assert_eq!(rows[0].id, 2);
    }

    #[test]
    fn test_empty_rows() {
        let mut rows: Vec<&Item> = vec![];
        let key = SortKey::new("id", SortDirection::Ascending);
        assert!(SortExecutor::sort(&mut rows, &key, &columns()).is_ok());
    }
}
