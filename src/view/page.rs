use crate::core::{ColumnSet, Result};

use super::filter::SearchFilter;
use super::query::{QueryState, clamp_page, page_count};
use super::sort::{SortExecutor, SortKey};

/// One render-ready page of a collection.
#[derive(Debug, Clone)]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Rows left after filtering, across all pages
    pub filtered_len: usize,
    /// Size of the cached collection
    pub total_len: usize,
}

impl<R> Page<R> {
    pub fn empty(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            page_index: 0,
            page_count: 0,
            page_size,
            filtered_len: 0,
            total_len: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    /// "Page 2 of 3 (12 rows)"
    pub fn summary(&self) -> String {
        let shown = if self.page_count == 0 { 0 } else { self.page_index + 1 };
        if self.filtered_len == self.total_len {
            format!("Page {} of {} ({} rows)", shown, self.page_count, self.total_len)
        } else {
            format!(
                "Page {} of {} ({} of {} rows)",
                shown, self.page_count, self.filtered_len, self.total_len
            )
        }
    }

    /// Plain-text table with padded columns.
    pub fn render_table(&self, columns: &ColumnSet<R>) -> String {
        if columns.column_count() == 0 {
            return "Empty result set\n".to_string();
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| columns.columns().iter().map(|col| col.cell(row)).collect())
            .collect();

        // Calculate column widths
        let mut widths: Vec<usize> = columns
            .columns()
            .iter()
            .map(|c| c.label.chars().count())
            .collect();
        for row in &cells {
            for (i, value) in row.iter().enumerate() {
                widths[i] = widths[i].max(value.chars().count());
            }
        }

        let mut out = String::new();

        let header: Vec<String> = columns
            .columns()
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{:width$}", col.label, width = widths[i]))
            .collect();
        out.push_str(header.join(" | ").trim_end());
        out.push('\n');

        let separator: String = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");
        out.push_str(&separator);
        out.push('\n');

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, val)| {
                    if columns.columns()[i].data_type.is_numeric() {
                        format!("{:>width$}", val, width = widths[i])
                    } else {
                        format!("{:width$}", val, width = widths[i])
                    }
                })
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
        }

        out.push_str(&format!("\n{}\n", self.summary()));
        out
    }
}

/// filter → sort → slice, computed from the collection and query alone.
///
/// The stored `page_index` is clamped against the filtered length here as
/// well, so a page derived right after the collection shrank is never empty
/// while earlier pages have rows.
pub fn derive_page<R: Clone>(
    collection: &[R],
    query: &QueryState,
    columns: &ColumnSet<R>,
    min_search_len: usize,
) -> Result<Page<R>> {
    let filter = SearchFilter::new(&query.debounced_search_term, min_search_len);
    let mut rows = filter.apply(collection, columns);

    if let Some(key) = &query.sort_key {
        let sort_key = SortKey::new(key.clone(), query.sort_direction);
        SortExecutor::sort(&mut rows, &sort_key, columns)?;
    }

    let filtered_len = rows.len();
    let page_size = query.page_size.max(1);
    let pages = page_count(filtered_len, page_size);
    let page_index = clamp_page(query.page_index as i64, pages);

    let rows = rows
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .cloned()
        .collect();

    Ok(Page {
        rows,
        page_index,
        page_count: pages,
        page_size,
        filtered_len,
        total_len: collection.len(),
    })
}
