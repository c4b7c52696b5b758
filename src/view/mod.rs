pub mod debounce;
pub mod filter;
pub mod model;
pub mod page;
pub mod query;
pub mod sort;

pub use debounce::Debouncer;
pub use filter::SearchFilter;
pub use model::{FetchStatus, LoadOutcome, MutationStatus, TableView};
pub use page::{Page, derive_page};
pub use query::{QueryState, SortDirection};
pub use sort::{NullOrdering, SortExecutor, SortKey};
