//! Catalog domain types: categories and products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bodega_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Category name (unique, non-empty).
    pub name: String,
    /// Free-form description; defaults to a placeholder.
    pub description: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A product in the catalog.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Units currently in stock.
    pub quantity: i32,
    /// Restock-suggestion threshold.
    pub min_stock: i32,
    /// Upper bound a restock may never exceed.
    pub max_stock: i32,
    /// Owning category.
    pub category_id: CategoryId,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is at or below its restock threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

/// A product joined with its category name, for listing pages.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub min_stock: i32,
    pub max_stock: i32,
    pub category_name: String,
}

/// Total stock held in one category, for the dashboard chart.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryStock {
    /// Category name.
    pub name: String,
    /// Sum of the quantities of every product in the category.
    pub total_quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i32, min_stock: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Refresco".to_string(),
            price: Decimal::new(1850, 2),
            quantity,
            min_stock,
            max_stock: 100,
            category_id: CategoryId::new(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock_boundary_inclusive() {
        assert!(product(5, 5).is_low_stock());
        assert!(product(0, 5).is_low_stock());
        assert!(!product(6, 5).is_low_stock());
    }
}
