// ============================================================================
// nexstock Library
// ============================================================================

pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod session;
pub mod view;

use std::sync::Arc;

// Re-export main types for convenience
pub use client::{ApiClient, RecordSource, RestSource};
pub use config::{ClientConfig, ViewConfig};
pub use core::{DashboardError, Record, RecordId, Result, Value};
pub use domain::{Customer, InventorySummary, Order, Product, ProductDraft, ProductStatus};
pub use session::{AuthSession, ThemeMode};
pub use view::{FetchStatus, LoadOutcome, MutationStatus, Page, TableView};

// ============================================================================
// High-level Dashboard API
// ============================================================================

/// Entry point: one backend connection that mounts table views.
///
/// # Examples
///
/// ```no_run
/// use nexstock::{ClientConfig, Dashboard, Product, ViewConfig};
///
/// # async fn demo() -> nexstock::Result<()> {
/// let dashboard = Dashboard::connect(
///     ClientConfig::new("http://localhost:3000"),
///     ViewConfig::default(),
/// )?;
///
/// let products = dashboard.view::<Product>();
/// products.load().await?;
/// products.set_sort("price")?;
///
/// for product in products.derived_page()?.rows {
///     println!("{} {}", product.name, product.price);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dashboard {
    api: ApiClient,
    view_config: ViewConfig,
}

impl Dashboard {
    pub fn connect(client_config: ClientConfig, view_config: ViewConfig) -> Result<Self> {
        let api = ApiClient::new(&client_config)?;
        Ok(Self { api, view_config })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view_config
    }

    /// Mounts a fresh view with default query state and an empty cache.
    pub fn view<R: Record>(&self) -> TableView<R> {
        self.view_with(&self.view_config)
    }

    /// Like [`Dashboard::view`] with a per-view configuration, e.g. the
    /// five-row pages used for orders and customers.
    pub fn view_with<R: Record>(&self, config: &ViewConfig) -> TableView<R> {
        let source: Arc<dyn RecordSource<R>> = Arc::new(self.api.source::<R>());
        TableView::new(source, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_connect_rejects_bad_url() {
        let result = Dashboard::connect(ClientConfig::new("::nope::"), ViewConfig::default());
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[tokio::test]
    async fn test_mounted_view_starts_idle() {
        let dashboard =
            Dashboard::connect(ClientConfig::default(), ViewConfig::default().page_size(5)).unwrap();
        let view = dashboard.view::<Order>();
        assert_eq!(view.fetch_status().unwrap(), FetchStatus::Idle);
        assert_eq!(view.query().unwrap().page_size, 5);
        assert_eq!(view.collection_len().unwrap(), 0);
    }
}
