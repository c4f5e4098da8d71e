//! Seed the catalog with sample data for local development.

use rust_decimal::Decimal;

use super::CommandError;

const CATEGORIES: &[(&str, &str)] = &[
    ("Bebidas", "Refrescos, agua y jugos."),
    ("Botanas", "Frituras y snacks."),
    ("Abarrotes", "Despensa básica."),
];

/// Sample products: (name, price, quantity, min, max, category name).
const PRODUCTS: &[(&str, &str, i32, i32, i32, &str)] = &[
    ("Agua 1L", "12.00", 30, 10, 60, "Bebidas"),
    ("Refresco de cola", "18.50", 24, 6, 48, "Bebidas"),
    ("Papas fritas", "15.00", 10, 5, 40, "Botanas"),
    ("Cacahuates", "14.00", 4, 5, 30, "Botanas"),
    ("Arroz 1kg", "28.00", 12, 4, 25, "Abarrotes"),
];

/// Insert the sample categories and products. Existing rows with the
/// same category name are reused, so the command is re-runnable.
///
/// # Errors
///
/// Returns `CommandError::Database` if an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    for (name, description) in CATEGORIES {
        sqlx::query(
            "INSERT INTO category (name, description)
             VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&pool)
        .await?;
    }

    for (name, price, quantity, min_stock, max_stock, category) in PRODUCTS {
        let price: Decimal = price.parse().unwrap_or_default();
        sqlx::query(
            "INSERT INTO product (name, price, quantity, min_stock, max_stock, category_id)
             SELECT $1, $2, $3, $4, $5, c.id
             FROM category c
             WHERE c.name = $6
               AND NOT EXISTS (SELECT 1 FROM product p WHERE p.name = $1)",
        )
        .bind(name)
        .bind(price)
        .bind(quantity)
        .bind(min_stock)
        .bind(max_stock)
        .bind(category)
        .execute(&pool)
        .await?;
    }

    tracing::info!("seed data inserted");
    Ok(())
}
