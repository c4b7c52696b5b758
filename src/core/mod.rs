pub mod error;
pub mod types;
pub mod value;

pub use error::{DashboardError, FieldError, Result, ValidationError};
pub use types::{Column, ColumnSet, MutationKey, NoDraft, Record, RecordId, Validate};
pub use value::{DataType, Value};
