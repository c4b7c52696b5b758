use std::cmp::Ordering;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{DataType, Result, Value};

/// Identifier assigned by the backend. json-server hands out either numbers
/// or strings depending on how the record was created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<&RecordId> for Value {
    fn from(id: &RecordId) -> Self {
        match id {
            RecordId::Number(n) => Value::Integer(*n),
            RecordId::Text(s) => Value::Text(s.clone()),
        }
    }
}

/// What a mutation status is tracked under: the single create slot, or the
/// id of the record being updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationKey {
    Create,
    Record(RecordId),
}

impl fmt::Display for MutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "new record"),
            Self::Record(id) => write!(f, "record #{}", id),
        }
    }
}

impl From<RecordId> for MutationKey {
    fn from(id: RecordId) -> Self {
        Self::Record(id)
    }
}

/// Client-side checks a payload must pass before it is sent.
pub trait Validate {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Draft type of read-only records. Uninhabited, so no create or update
/// payload can ever be built for them.
#[derive(Debug, Clone, Serialize)]
pub enum NoDraft {}

impl Validate for NoDraft {}

/// An entity the dashboard can list.
pub trait Record: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Body sent on create and update.
    type Draft: Validate + Serialize + Send + Sync + 'static;

    /// Path segment of the collection on the backend, e.g. `products`.
    const RESOURCE: &'static str;

    /// Whether the dashboard may create, update or delete this entity.
    const WRITABLE: bool = false;

    fn id(&self) -> RecordId;

    fn columns() -> ColumnSet<Self>;
}

pub type Accessor<R> = fn(&R) -> Value;
pub type Comparator = fn(&Value, &Value) -> Ordering;
pub type Formatter = fn(&Value) -> String;

/// Declarative description of one table column.
pub struct Column<R> {
    pub key: &'static str,
    pub label: &'static str,
    pub data_type: DataType,
    pub accessor: Accessor<R>,
    pub comparator: Option<Comparator>,
    pub formatter: Option<Formatter>,
    pub sortable: bool,
    pub searchable: bool,
}

impl<R> Column<R> {
    pub fn new(
        key: &'static str,
        label: &'static str,
        data_type: DataType,
        accessor: Accessor<R>,
    ) -> Self {
        Self {
            key,
            label,
            data_type,
            accessor,
            comparator: None,
            formatter: None,
            sortable: true,
            searchable: false,
        }
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn value(&self, record: &R) -> Value {
        (self.accessor)(record)
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match self.comparator {
            Some(cmp) => cmp(a, b),
            None => a.sort_cmp(b),
        }
    }

    pub fn format(&self, value: &Value) -> String {
        match self.formatter {
            Some(fmt) => fmt(value),
            None => value.to_string(),
        }
    }

    /// Rendered cell text for a record.
    pub fn cell(&self, record: &R) -> String {
        self.format(&self.value(record))
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("data_type", &self.data_type)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .finish()
    }
}

#[derive(Debug)]
pub struct ColumnSet<R> {
    columns: Vec<Column<R>>,
}

impl<R> ColumnSet<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn find_column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.key == key)
    }

    pub fn get_column(&self, key: &str) -> Option<&Column<R>> {
        self.find_column_index(key).map(|idx| &self.columns[idx])
    }

    pub fn searchable(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns.iter().filter(|col| col.searchable)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.columns.iter().map(|col| col.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: String,
        qty: i64,
    }

    fn columns() -> ColumnSet<Item> {
        ColumnSet::new(vec![
            Column::new("name", "Name", DataType::Text, |i: &Item| Value::from(i.name.as_str()))
                .searchable(),
            Column::new("qty", "Qty", DataType::Integer, |i: &Item| Value::Integer(i.qty))
                .with_formatter(|v| format!("{} pcs", v)),
        ])
    }

    #[test]
    fn test_column_lookup() {
        let set = columns();
        assert_eq!(set.find_column_index("qty"), Some(1));
        assert!(set.get_column("missing").is_none());
        assert_eq!(set.searchable().count(), 1);
        assert_eq!(set.labels(), vec!["Name", "Qty"]);
    }

    #[test]
    fn test_cell_uses_formatter() {
        let set = columns();
        let item = Item {
            name: "Cable".into(),
            qty: 4,
        };
        assert_eq!(set.columns()[0].cell(&item), "Cable");
        assert_eq!(set.columns()[1].cell(&item), "4 pcs");
    }

    #[test]
    fn test_record_id_serde_accepts_numbers_and_strings() {
        let n: RecordId = serde_json::from_str("7").unwrap();
        let s: RecordId = serde_json::from_str("\"a1b2\"").unwrap();
        assert_eq!(n, RecordId::Number(7));
        assert_eq!(s, RecordId::from("a1b2"));
        assert_eq!(MutationKey::from(n).to_string(), "record #7");
    }
}
