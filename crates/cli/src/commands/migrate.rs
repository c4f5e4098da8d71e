//! Database migration command.
//!
//! Runs the server's sqlx migrations. The session store's own schema is
//! migrated by the server at startup, not here.

use super::CommandError;

/// Run all pending migrations from `crates/server/migrations/`.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
