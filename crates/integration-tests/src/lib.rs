//! Integration test harness for Bodega.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p bodega-cli -- migrate
//!
//! # Start the server
//! cargo run -p bodega-server
//!
//! # Run the (otherwise ignored) integration tests
//! cargo test -p bodega-integration-tests -- --ignored
//! ```
//!
//! Tests talk to the server over HTTP with a cookie-holding client and
//! arrange/inspect database state directly over a `PgPool`.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use reqwest::{Client, redirect};
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Shared context for one test: HTTP client plus direct database access.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the server and database named by the environment.
    ///
    /// Uses `BODEGA_BASE_URL` (default `http://localhost:3100`) and
    /// `BODEGA_DATABASE_URL` / `DATABASE_URL`.
    ///
    /// # Panics
    ///
    /// Panics if the database is unreachable; the tests carrying this
    /// context are `#[ignore]`d unless the infrastructure is running.
    pub async fn new() -> Self {
        let base_url = std::env::var("BODEGA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3100".to_string());

        let database_url = std::env::var("BODEGA_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("BODEGA_DATABASE_URL must be set for integration tests");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        // Redirects are assertions in these tests, so don't follow them.
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            pool,
        }
    }

    /// Absolute URL for a path on the server under test.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in as the default administrator, creating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the login does not redirect to the dashboard.
    pub async fn login_as_admin(&self) {
        let _ = self.client.get(self.url("/setup")).send().await;

        let resp = self
            .client
            .post(self.url("/login"))
            .form(&[("username", "admin"), ("password", "admin123")])
            .send()
            .await
            .expect("login request failed");

        assert!(
            resp.status().is_redirection(),
            "admin login failed: {}",
            resp.status()
        );
    }

    /// Log in as `username` with `password`.
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("login request failed")
    }

    /// Insert a user directly, hashing the password the way the server
    /// does.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn create_user(&self, username: &str, password: &str, role: &str) {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("hash password")
            .to_string();

        sqlx::query(
            "INSERT INTO app_user (username, password_hash, name, role)
             VALUES ($1, $2, $3, $4::user_role)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(hash)
        .bind(username)
        .bind(role)
        .execute(&self.pool)
        .await
        .expect("insert test user");
    }

    /// Insert a category and return its id, reusing it if present.
    pub async fn ensure_category(&self, name: &str) -> i32 {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO category (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .expect("insert test category")
    }

    /// Insert a product and return its id.
    pub async fn create_product(
        &self,
        name: &str,
        price: &str,
        quantity: i32,
        min_stock: i32,
        max_stock: i32,
        category_id: i32,
    ) -> i32 {
        let price: Decimal = price.parse().expect("price literal");
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO product (name, price, quantity, min_stock, max_stock, category_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(name)
        .bind(price)
        .bind(quantity)
        .bind(min_stock)
        .bind(max_stock)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .expect("insert test product")
    }

    /// Current stock quantity of a product.
    pub async fn product_quantity(&self, product_id: i32) -> i32 {
        sqlx::query_scalar::<_, i32>("SELECT quantity FROM product WHERE id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .expect("query quantity")
    }

    /// Number of ledger line items referencing a product.
    pub async fn ledger_entries_for(&self, product_id: i32) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sale_item WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .expect("count ledger entries")
    }

    /// Sum of all recorded sale totals.
    pub async fn ledger_total(&self) -> Decimal {
        sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM sale",
        )
        .fetch_one(&self.pool)
        .await
        .expect("sum ledger")
    }

    /// Empty the sales ledger.
    ///
    /// # Panics
    ///
    /// Panics if the truncation fails.
    pub async fn clear_ledger(&self) {
        sqlx::query("TRUNCATE sale CASCADE")
            .execute(&self.pool)
            .await
            .expect("truncate ledger");
    }

    /// Remove a product created by a test.
    pub async fn delete_product(&self, product_id: i32) {
        let _ = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await;
    }
}

/// Location header of a redirect response, as a string.
#[must_use]
pub fn location_of(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
