use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Transient search, sort and pagination settings of one mounted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub debounced_search_term: String,
    pub sort_key: Option<String>,
    pub sort_direction: SortDirection,
    pub page_index: usize,
    pub page_size: usize,
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            debounced_search_term: String::new(),
            sort_key: None,
            sort_direction: SortDirection::Ascending,
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// Same key flips the direction, a new key starts ascending.
    pub fn toggle_sort(&mut self, key: &str) {
        if self.sort_key.as_deref() == Some(key) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_key = Some(key.to_string());
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Applies a settled search term. Returns true and rewinds to the first
    /// page only when the term actually changed.
    pub fn apply_debounced(&mut self, term: String) -> bool {
        if self.debounced_search_term == term {
            return false;
        }
        self.debounced_search_term = term;
        self.page_index = 0;
        true
    }

    pub fn page_count(&self, filtered_len: usize) -> usize {
        page_count(filtered_len, self.page_size)
    }

    pub fn set_page(&mut self, index: i64, filtered_len: usize) -> usize {
        self.page_index = clamp_page(index, self.page_count(filtered_len));
        self.page_index
    }

    /// Pulls `page_index` back inside the range after the filtered length shrank.
    pub fn clamp_page(&mut self, filtered_len: usize) {
        let last = self.page_count(filtered_len).saturating_sub(1);
        self.page_index = self.page_index.min(last);
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(10)
    }
}

/// `ceil(len / page_size)`; zero rows means zero pages.
pub fn page_count(filtered_len: usize, page_size: usize) -> usize {
    filtered_len.div_ceil(page_size.max(1))
}

/// Clamps any requested index, negative or overflowing, into
/// `[0, max(0, page_count - 1)]`.
pub fn clamp_page(index: i64, page_count: usize) -> usize {
    if index <= 0 {
        return 0;
    }
    let last = page_count.saturating_sub(1);
    usize::try_from(index).map_or(last, |i| i.min(last))
}
