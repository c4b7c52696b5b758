use anyhow::{Context, Result};
use clap::Args;
use nexstock::core::Record;
use nexstock::{Customer, Dashboard, Order, Product, TableView};

use super::Resource;

/// One-shot listing, printed as a plain text table.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    /// Case-insensitive search over the searchable columns
    #[arg(long, short)]
    pub search: Option<String>,

    /// Column key to sort by, e.g. `price`
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// 1-based page number; out-of-range values are clamped
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,
}

pub async fn run(dashboard: &Dashboard, args: &ListArgs, page_size: Option<usize>) -> Result<String> {
    let config = args.resource.view_config(dashboard.view_config(), page_size);
    match args.resource {
        Resource::Products => render(dashboard.view_with::<Product>(&config), args).await,
        Resource::Orders => render(dashboard.view_with::<Order>(&config), args).await,
        Resource::Customers => render(dashboard.view_with::<Customer>(&config), args).await,
    }
}

async fn render<R: Record>(view: TableView<R>, args: &ListArgs) -> Result<String> {
    view.load()
        .await
        .with_context(|| format!("failed to load {}", R::RESOURCE))?;

    if let Some(term) = &args.search {
        view.commit_search_term(term)?;
    }
    if let Some(key) = &args.sort {
        view.set_sort(key)
            .with_context(|| format!("cannot sort {} by '{key}'", R::RESOURCE))?;
        if args.desc {
            view.set_sort(key)?;
        }
    }
    view.set_page(args.page.saturating_sub(1))?;

    let page = view.derived_page()?;
    Ok(page.render_table(view.columns()))
}
