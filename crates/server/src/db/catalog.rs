//! Catalog repository: categories and products.
//!
//! Stock *mutations* (restock, sell) are not here; they live in the
//! stock workflow service so that the quantity checks and ledger writes
//! share one transaction.

use sqlx::PgPool;

use bodega_core::{CategoryId, ProductId};
use rust_decimal::Decimal;

use super::{RepositoryError, conflict_on_unique};
use crate::models::{Category, CategoryStock, Product, ProductListing};

const PRODUCT_COLUMNS: &str =
    "id, name, price, quantity, min_stock, max_stock, category_id, created_at, updated_at";

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub min_stock: i32,
    pub max_stock: i32,
    pub category_id: CategoryId,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at
             FROM category
             ORDER BY created_at ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Create a new category.
    ///
    /// An empty description falls back to the column default placeholder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO category (name, description)
             VALUES ($1, COALESCE($2, 'Sin descripción.'))
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(name)
        .bind(description.filter(|d| !d.trim().is_empty()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "category name already exists"))?;

        Ok(category)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products joined with their category name.
    ///
    /// `filter` is a case-insensitive substring match on the product
    /// name; `None` or an empty string returns the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<ProductListing>, RepositoryError> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());

        let listings = sqlx::query_as::<_, ProductListing>(
            "SELECT p.id, p.name, p.price, p.quantity, p.min_stock, p.max_stock,
                    c.name AS category_name
             FROM product p
             JOIN category c ON c.id = p.category_id
             WHERE $1::TEXT IS NULL OR p.name ILIKE '%' || $1 || '%'
             ORDER BY p.name ASC",
        )
        .bind(filter)
        .fetch_all(self.pool)
        .await?;

        Ok(listings)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List all products sorted by name (for the restock form).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products_by_name(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY name ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Create a new product.
    ///
    /// The `min_stock < max_stock` invariant is checked by the caller at
    /// creation time; the category reference is enforced by the schema.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_product(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO product (name, price, quantity, min_stock, max_stock, category_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.price)
        .bind(new.quantity)
        .bind(new.min_stock)
        .bind(new.max_stock)
        .bind(new.category_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict("category does not exist".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(product)
    }

    /// Delete a product by its ID.
    ///
    /// Ledger entries referencing the product are unaffected: line items
    /// are snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List products at or below their restock threshold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn low_stock(&self) -> Result<Vec<ProductListing>, RepositoryError> {
        let listings = sqlx::query_as::<_, ProductListing>(
            "SELECT p.id, p.name, p.price, p.quantity, p.min_stock, p.max_stock,
                    c.name AS category_name
             FROM product p
             JOIN category c ON c.id = p.category_id
             WHERE p.quantity <= p.min_stock
             ORDER BY p.name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(listings)
    }

    /// Total units in stock per category.
    ///
    /// Categories without products are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stock_by_category(&self) -> Result<Vec<CategoryStock>, RepositoryError> {
        let totals = sqlx::query_as::<_, CategoryStock>(
            "SELECT c.name, SUM(p.quantity)::BIGINT AS total_quantity
             FROM product p
             JOIN category c ON c.id = p.category_id
             GROUP BY c.name
             ORDER BY c.name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(totals)
    }
}
