pub mod app;
pub mod form;
pub mod list;
pub mod ui;

use clap::ValueEnum;
use nexstock::ViewConfig;

/// Rows per page on the order and customer screens.
pub const DETAIL_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Products,
    Orders,
    Customers,
}

impl Resource {
    /// View settings for this collection. An explicit `--page-size` wins over
    /// the per-collection default.
    pub fn view_config(self, base: &ViewConfig, page_size: Option<usize>) -> ViewConfig {
        let default = match self {
            Self::Products => base.page_size,
            Self::Orders | Self::Customers => DETAIL_PAGE_SIZE,
        };
        base.clone().page_size(page_size.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_screens_use_five_rows() {
        let base = ViewConfig::default();
        assert_eq!(Resource::Products.view_config(&base, None).page_size, 10);
        assert_eq!(Resource::Orders.view_config(&base, None).page_size, 5);
        assert_eq!(Resource::Customers.view_config(&base, Some(8)).page_size, 8);
    }
}
