//! Dashboard entities and their column layouts.

pub mod customer;
pub mod order;
pub mod product;
pub mod summary;

use chrono::NaiveDate;

use crate::core::Value;

pub use customer::{Customer, CustomerStatus};
pub use order::{Order, OrderStatus};
pub use product::{Product, ProductDraft, ProductStatus};
pub use summary::InventorySummary;

/// `1234.5` → `$1,234.50`. Non-numeric values render as-is.
pub fn format_money(value: &Value) -> String {
    let Some(amount) = value.as_f64() else {
        return value.to_string();
    };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Backend dates arrive as `YYYY-MM-DD` or a full ISO timestamp. Anything
/// else is kept as text so it still shows up and sorts.
pub fn parse_date(raw: &str) -> Value {
    let head = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(head, "%Y-%m-%d") {
        Ok(date) => Value::Date(date),
        Err(_) if raw.is_empty() => Value::Null,
        Err(_) => Value::Text(raw.to_string()),
    }
}
