//! User domain types.

use chrono::{DateTime, Utc};

use bodega_core::{Role, UserId};

/// An application user (domain type).
///
/// The password hash is not part of this type; it is only surfaced by
/// the repository method that verifies credentials.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name (unique).
    pub username: String,
    /// Display name.
    pub name: String,
    /// Permission level.
    pub role: Role,
    /// Profile photo filename under the uploads directory.
    pub photo: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
