//! Sales ledger repository.
//!
//! The ledger is append-only; the insert happens inside the stock
//! workflow's transaction. This repository covers the read side used by
//! reporting, plus the persisted daily-totals baseline.

use chrono::{DateTime, Local, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

/// Repository for sales ledger database operations.
pub struct SalesRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SalesRepository<'a> {
    /// Create a new sales repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Sum of `total_amount` over the whole ledger.
    ///
    /// An empty ledger sums to zero, never an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_all_time(&self) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM sale",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    /// Sum of `total_amount` over sales at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_since(&self, since: DateTime<Utc>) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM sale WHERE sold_at >= $1",
        )
        .bind(since)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    // =========================================================================
    // Daily baseline
    // =========================================================================

    /// Get the daily-totals baseline, initializing it to local midnight
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_baseline(&self) -> Result<DateTime<Utc>, RepositoryError> {
        let existing = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT daily_started_at FROM report_state WHERE id",
        )
        .fetch_optional(self.pool)
        .await?;

        if let Some(baseline) = existing {
            return Ok(baseline);
        }

        let midnight = local_midnight();
        // Another request may have initialized the row concurrently;
        // keep whichever value landed first.
        let baseline = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO report_state (id, daily_started_at)
             VALUES (TRUE, $1)
             ON CONFLICT (id) DO UPDATE SET daily_started_at = report_state.daily_started_at
             RETURNING daily_started_at",
        )
        .bind(midnight)
        .fetch_one(self.pool)
        .await?;

        Ok(baseline)
    }

    /// Reset the daily-totals baseline to now. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn reset_daily_baseline(&self) -> Result<DateTime<Utc>, RepositoryError> {
        let baseline = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO report_state (id, daily_started_at)
             VALUES (TRUE, now())
             ON CONFLICT (id) DO UPDATE SET daily_started_at = now()
             RETURNING daily_started_at",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(baseline)
    }
}

/// Midnight of the current local day, in UTC.
fn local_midnight() -> DateTime<Utc> {
    Local::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .single()
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_midnight_is_in_the_past() {
        let midnight = local_midnight();
        assert!(midnight <= Utc::now());
        // Never more than a day behind.
        assert!(Utc::now() - midnight <= chrono::Duration::days(1));
    }
}
