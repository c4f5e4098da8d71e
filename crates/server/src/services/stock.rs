//! Stock workflow: restock and sell.
//!
//! Both operations are read-then-conditionally-write against the
//! catalog. The legacy system checked stock in application code and
//! wrote afterwards, leaving a check-then-act race and a window where a
//! ledger entry could exist without its stock decrement. Here both are
//! closed deliberately: the quantity change is a conditional `UPDATE`
//! (zero rows affected means the condition lost), and for sales the
//! decrement and the ledger insert share one transaction.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bodega_core::ProductId;

use crate::db::{CatalogRepository, RepositoryError};
use crate::models::{ProductListing, SaleDraft};

/// Errors produced by the stock workflow.
#[derive(Debug, Error)]
pub enum StockError {
    /// Quantity missing, non-numeric, or not strictly positive.
    #[error("invalid quantity")]
    InvalidInput,

    /// The transacting product does not exist.
    #[error("product not found")]
    NotFound,

    /// Restock would push the quantity above `max_stock`.
    #[error("restock would exceed the maximum stock of {max}")]
    LimitExceeded {
        /// The product's configured maximum.
        max: i32,
    },

    /// Sale exceeds the available quantity.
    #[error("insufficient stock: {available} available")]
    InsufficientStock {
        /// Units available at the time of the attempt.
        available: i32,
    },

    /// Underlying persistence failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for StockError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Confirmation data returned by a successful restock.
#[derive(Debug, Clone)]
pub struct RestockReceipt {
    /// Product name, for the confirmation message.
    pub product_name: String,
    /// Units added.
    pub added: i32,
    /// Quantity after the restock.
    pub new_quantity: i32,
}

/// Confirmation data returned by a successful sale.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    /// Product name, for the confirmation message.
    pub product_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Charged total (`unit price x quantity`).
    pub total: Decimal,
}

/// Parse a form-submitted quantity.
///
/// # Errors
///
/// Returns [`StockError::InvalidInput`] unless the input is a strictly
/// positive integer.
pub fn parse_quantity(raw: &str) -> Result<i32, StockError> {
    match raw.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(StockError::InvalidInput),
    }
}

/// The stock workflow service.
pub struct StockService<'a> {
    pool: &'a PgPool,
}

impl<'a> StockService<'a> {
    /// Create a new stock service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add `add_quantity` units to a product's stock.
    ///
    /// The restock is rejected whole if it would push the quantity above
    /// `max_stock`; landing exactly on `max_stock` is allowed.
    ///
    /// # Errors
    ///
    /// Returns `StockError::InvalidInput` if `add_quantity` is not positive,
    /// `StockError::NotFound` if the product doesn't exist,
    /// `StockError::LimitExceeded` if the bound would be violated.
    pub async fn restock(
        &self,
        product_id: ProductId,
        add_quantity: i32,
    ) -> Result<RestockReceipt, StockError> {
        if add_quantity <= 0 {
            return Err(StockError::InvalidInput);
        }

        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, ProductGuardRow>(
            "SELECT name, max_stock FROM product WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StockError::NotFound)?;

        // The condition is re-evaluated by the store, so a concurrent
        // restock cannot slip past the bound between read and write.
        let new_quantity = sqlx::query_scalar::<_, i32>(
            "UPDATE product
             SET quantity = quantity + $2, updated_at = now()
             WHERE id = $1 AND quantity + $2 <= max_stock
             RETURNING quantity",
        )
        .bind(product_id)
        .bind(add_quantity)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StockError::LimitExceeded {
            max: product.max_stock,
        })?;

        tx.commit().await?;

        tracing::info!(
            product = %product.name,
            added = add_quantity,
            quantity = new_quantity,
            "restock applied"
        );

        Ok(RestockReceipt {
            product_name: product.name,
            added: add_quantity,
            new_quantity,
        })
    }

    /// Sell `sale_quantity` units of a product.
    ///
    /// Appends exactly one ledger entry snapshotting the product and
    /// decrements the stock, both inside a single transaction. Selling
    /// exactly the remaining stock is allowed.
    ///
    /// # Errors
    ///
    /// Returns `StockError::InvalidInput` if `sale_quantity` is not positive,
    /// `StockError::NotFound` if the product doesn't exist,
    /// `StockError::InsufficientStock` if fewer units are available.
    pub async fn sell(
        &self,
        product_id: ProductId,
        sale_quantity: i32,
    ) -> Result<SaleReceipt, StockError> {
        if sale_quantity <= 0 {
            return Err(StockError::InvalidInput);
        }

        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, ProductSnapshotRow>(
            "SELECT name, price, quantity FROM product WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StockError::NotFound)?;

        // Atomic conditional decrement: zero rows affected means another
        // sale drained the stock first, or there was never enough.
        let decremented = sqlx::query(
            "UPDATE product
             SET quantity = quantity - $2, updated_at = now()
             WHERE id = $1 AND quantity >= $2",
        )
        .bind(product_id)
        .bind(sale_quantity)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            return Err(StockError::InsufficientStock {
                available: product.quantity,
            });
        }

        let draft = SaleDraft::single(product_id, product.name, product.price, sale_quantity);

        let sale_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO sale (total_amount) VALUES ($1) RETURNING id",
        )
        .bind(draft.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in draft.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO sale_item
                     (sale_id, product_id, name, unit_price, quantity, subtotal, position)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(sale_id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.subtotal)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let item_name = draft
            .items
            .first()
            .map_or_else(String::new, |i| i.name.clone());

        tracing::info!(
            product = %item_name,
            quantity = sale_quantity,
            total = %draft.total_amount,
            "sale recorded"
        );

        Ok(SaleReceipt {
            product_name: item_name,
            quantity: sale_quantity,
            total: draft.total_amount,
        })
    }

    /// Products at or below their restock threshold. No side effects.
    ///
    /// # Errors
    ///
    /// Returns `StockError::Repository` if the query fails.
    pub async fn low_stock(&self) -> Result<Vec<ProductListing>, StockError> {
        let listings = CatalogRepository::new(self.pool).low_stock().await?;
        Ok(listings)
    }
}

/// Row read before a restock to distinguish missing products from
/// limit violations.
#[derive(sqlx::FromRow)]
struct ProductGuardRow {
    name: String,
    max_stock: i32,
}

/// Product snapshot captured for a ledger line item.
#[derive(sqlx::FromRow)]
struct ProductSnapshotRow {
    name: String,
    price: Decimal,
    quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_accepts_positive_integers() {
        assert_eq!(parse_quantity("3").expect("valid"), 3);
        assert_eq!(parse_quantity(" 15 ").expect("valid"), 15);
    }

    #[test]
    fn test_parse_quantity_rejects_zero_and_negatives() {
        assert!(matches!(parse_quantity("0"), Err(StockError::InvalidInput)));
        assert!(matches!(parse_quantity("-4"), Err(StockError::InvalidInput)));
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert!(matches!(parse_quantity(""), Err(StockError::InvalidInput)));
        assert!(matches!(parse_quantity("abc"), Err(StockError::InvalidInput)));
        assert!(matches!(
            parse_quantity("3.5"),
            Err(StockError::InvalidInput)
        ));
    }

    #[test]
    fn test_stock_error_messages() {
        assert_eq!(
            StockError::LimitExceeded { max: 20 }.to_string(),
            "restock would exceed the maximum stock of 20"
        );
        assert_eq!(
            StockError::InsufficientStock { available: 2 }.to_string(),
            "insufficient stock: 2 available"
        );
    }
}
