use serde::{Deserialize, Serialize};

use crate::core::{Column, ColumnSet, DataType, NoDraft, Record, RecordId, Value};

use super::{format_money, parse_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    Active,
    /// Anything the backend sends other than "Active" reads as inactive.
    #[serde(other)]
    Inactive,
}

impl CustomerStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub total_spent: f64,
    pub status: CustomerStatus,
    pub join_date: String,
}

impl Record for Customer {
    type Draft = NoDraft;

    const RESOURCE: &'static str = "customers";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn columns() -> ColumnSet<Self> {
        ColumnSet::new(vec![
            Column::new("name", "Customer Name", DataType::Text, |c: &Customer| {
                Value::from(c.name.as_str())
            })
            .searchable(),
            Column::new("email", "Email", DataType::Text, |c: &Customer| {
                Value::from(c.email.as_str())
            })
            .searchable(),
            Column::new("phone", "Phone", DataType::Text, |c: &Customer| {
                Value::from(c.phone.as_str())
            })
            .searchable()
            .unsortable(),
            Column::new("totalSpent", "Total Spent", DataType::Float, |c: &Customer| {
                Value::Float(c.total_spent)
            })
            .with_formatter(format_money),
            Column::new("status", "Status", DataType::Text, |c: &Customer| {
                Value::from(c.status.label())
            }),
            Column::new("joinDate", "Join Date", DataType::Date, |c: &Customer| {
                parse_date(&c.join_date)
            }),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SearchFilter;

    fn customers() -> Vec<Customer> {
        serde_json::from_str(
            r#"[
                {"id":1,"name":"Ayse Yilmaz","email":"ayse@example.com","phone":"+90 555 010 2030","totalSpent":1520.75,"status":"Active","joinDate":"2023-05-14"},
                {"id":2,"name":"John Smith","email":"john@shop.io","totalSpent":0,"status":"Inactive","joinDate":"2024-01-02"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_search_covers_email_and_phone() {
        let data = customers();
        let columns = Customer::columns();
        assert_eq!(SearchFilter::new("shop.io", 3).count(&data, &columns), 1);
        assert_eq!(SearchFilter::new("555 010", 3).count(&data, &columns), 1);
        // status is displayed but not searched
        assert_eq!(SearchFilter::new("inactive", 3).count(&data, &columns), 0);
    }

    #[test]
    fn test_missing_phone_defaults_empty() {
        let data = customers();
        assert_eq!(data[1].phone, "");
        assert_eq!(
            Customer::columns().get_column("totalSpent").unwrap().cell(&data[0]),
            "$1,520.75"
        );
    }

    #[test]
    fn test_unknown_status_reads_as_inactive() {
        let data: Vec<Customer> = serde_json::from_str(
            r#"[{"id":3,"name":"Lena Park","email":"lena@example.com","totalSpent":12,"status":"Blocked","joinDate":"2024-02-10"}]"#,
        )
        .unwrap();
        assert_eq!(data[0].status, CustomerStatus::Inactive);
        assert_eq!(Customer::columns().get_column("status").unwrap().cell(&data[0]), "Inactive");
    }
}
