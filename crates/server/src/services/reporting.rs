//! Reporting: money totals and stock aggregation for the dashboard.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::{CatalogRepository, RepositoryError, SalesRepository};
use crate::models::CategoryStock;

/// Money totals for the three dashboard windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesTotals {
    /// Sum over the whole ledger.
    pub all_time: Decimal,
    /// Sum over the trailing seven days.
    pub last_week: Decimal,
    /// Sum since the last daily reset.
    pub today: Decimal,
}

/// The reporting service.
///
/// Owns the daily-reset baseline: a persisted timestamp rather than a
/// process-global, so totals are deterministic under test and survive
/// restarts.
pub struct ReportingService<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportingService<'a> {
    /// Create a new reporting service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Compute the three dashboard totals.
    ///
    /// An empty ledger yields zero for every window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn sales_totals(&self) -> Result<SalesTotals, RepositoryError> {
        let sales = SalesRepository::new(self.pool);

        let all_time = sales.total_all_time().await?;
        let last_week = sales.total_since(Utc::now() - Duration::days(7)).await?;
        let baseline = sales.daily_baseline().await?;
        let today = sales.total_since(baseline).await?;

        Ok(SalesTotals {
            all_time,
            last_week,
            today,
        })
    }

    /// Reset the daily counter baseline to now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn reset_daily(&self) -> Result<(), RepositoryError> {
        let baseline = SalesRepository::new(self.pool).reset_daily_baseline().await?;
        tracing::info!(%baseline, "daily sales counter reset");
        Ok(())
    }

    /// Existing stock grouped by category name.
    ///
    /// Categories with no products are absent, not zero-valued.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stock_by_category(&self) -> Result<Vec<CategoryStock>, RepositoryError> {
        CatalogRepository::new(self.pool).stock_by_category().await
    }
}
