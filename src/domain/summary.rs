use super::product::{Product, ProductStatus};

/// Headline figures shown on the dashboard screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySummary {
    pub product_count: usize,
    pub total_units: i64,
    pub inventory_value: f64,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl InventorySummary {
    pub fn from_products(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |mut acc, p| {
            acc.product_count += 1;
            acc.total_units += p.stock.max(0);
            acc.inventory_value += p.price * p.stock.max(0) as f64;
            match p.status {
                ProductStatus::LowStock => acc.low_stock += 1,
                ProductStatus::OutOfStock => acc.out_of_stock += 1,
                ProductStatus::InStock => {}
            }
            acc
        })
    }

    /// Products that need restocking.
    pub fn attention_count(&self) -> usize {
        self.low_stock + self.out_of_stock
    }
}
