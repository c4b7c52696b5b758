use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    Column, ColumnSet, DataType, Record, RecordId, Result, Validate, ValidationError, Value,
};

use super::format_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 3] = [Self::InStock, Self::LowStock, Self::OutOfStock];

    pub fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw.trim()))
    }

    /// Next value in form order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::InStock => Self::LowStock,
            Self::LowStock => Self::OutOfStock,
            Self::OutOfStock => Self::InStock,
        }
    }

    pub fn previous(self) -> Self {
        self.next().next()
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub price: f64,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Record for Product {
    type Draft = ProductDraft;

    const RESOURCE: &'static str = "products";
    const WRITABLE: bool = true;

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn columns() -> ColumnSet<Self> {
        ColumnSet::new(vec![
            Column::new("name", "Product Name", DataType::Text, |p: &Product| {
                Value::from(p.name.as_str())
            })
            .searchable(),
            Column::new("category", "Category", DataType::Text, |p: &Product| {
                Value::from(p.category.as_str())
            })
            .searchable(),
            Column::new("price", "Price", DataType::Float, |p: &Product| Value::Float(p.price))
                .with_formatter(format_money),
            Column::new("stock", "Stock", DataType::Integer, |p: &Product| {
                Value::Integer(p.stock)
            }),
            Column::new("status", "Status", DataType::Text, |p: &Product| {
                Value::from(p.status.label())
            })
            .searchable(),
        ])
    }
}

/// Create/edit form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub status: ProductStatus,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            price: 0.0,
            stock: 0,
            status: ProductStatus::InStock,
        }
    }
}

impl ProductDraft {
    pub fn new(name: &str, category: &str, price: f64, stock: i64, status: ProductStatus) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            price,
            stock,
            status,
        }
    }

    /// Prefills the edit form.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            status: product.status,
        }
    }

    /// Builds a draft from raw form text. Numbers that do not parse are
    /// reported alongside the regular field rules.
    pub fn from_form(
        name: &str,
        category: &str,
        price: &str,
        stock: &str,
        status: ProductStatus,
    ) -> Result<Self> {
        let mut errors = ValidationError::new();
        let price = price.trim().parse::<f64>().unwrap_or_else(|_| {
            errors.push("price", "Price must be a number.");
            0.0
        });
        let stock = stock.trim().parse::<i64>().unwrap_or_else(|_| {
            errors.push("stock", "Stock must be a whole number.");
            0
        });
        let draft = Self {
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            price,
            stock,
            status,
        };
        draft.collect_errors(&mut errors);
        errors.into_result()?;
        Ok(draft)
    }

    fn collect_errors(&self, errors: &mut ValidationError) {
        if self.name.trim().chars().count() < 2 {
            errors.push("name", "The product name must be at least 2 characters long.");
        }
        if self.category.trim().chars().count() < 2 {
            errors.push("category", "Category is required.");
        }
        if errors.message_for("price").is_none() && !(self.price.is_finite() && self.price >= 0.0) {
            errors.push("price", "Price cannot be less than zero.");
        }
        if errors.message_for("stock").is_none() && self.stock < 0 {
            errors.push("stock", "Stock cannot be less than zero.");
        }
    }
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationError::new();
        self.collect_errors(&mut errors);
        errors.into_result()
    }
}
