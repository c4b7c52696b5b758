use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Column, ColumnSet, DataType, NoDraft, Record, RecordId, Value};

use super::{format_money, parse_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Orders are listed only; the dashboard never writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: RecordId,
    pub customer_name: String,
    pub order_date: String,
    pub total_amount: f64,
    pub status: OrderStatus,
}

impl Record for Order {
    type Draft = NoDraft;

    const RESOURCE: &'static str = "orders";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn columns() -> ColumnSet<Self> {
        ColumnSet::new(vec![
            Column::new("id", "Order No.", DataType::Text, |o: &Order| Value::from(&o.id))
                .with_formatter(|v| format!("#{}", v)),
            Column::new("customerName", "Customer", DataType::Text, |o: &Order| {
                Value::from(o.customer_name.as_str())
            })
            .searchable(),
            Column::new("orderDate", "Date", DataType::Date, |o: &Order| {
                parse_date(&o.order_date)
            }),
            Column::new("totalAmount", "Amount", DataType::Float, |o: &Order| {
                Value::Float(o.total_amount)
            })
            .with_formatter(format_money),
            Column::new("status", "Status", DataType::Text, |o: &Order| {
                Value::from(o.status.label())
            })
            .searchable(),
        ])
    }
}
