//! User management commands.

use std::str::FromStr;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use bodega_core::Role;

use super::CommandError;

/// Create a user with the given role.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` for an unknown role, a blank
/// username, or a password shorter than 8 characters;
/// `CommandError::Database` if the insert fails (e.g. duplicate
/// username).
pub async fn create_user(
    username: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), CommandError> {
    let role = Role::from_str(role).map_err(CommandError::InvalidArgument)?;

    let username = username.trim();
    if username.is_empty() {
        return Err(CommandError::InvalidArgument("username is empty".into()));
    }
    if password.len() < 8 {
        return Err(CommandError::InvalidArgument(
            "password must be at least 8 characters".into(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?
        .to_string();

    let pool = super::connect().await?;

    sqlx::query("INSERT INTO app_user (username, password_hash, name, role) VALUES ($1, $2, $3, $4)")
        .bind(username)
        .bind(&password_hash)
        .bind(name)
        .bind(role)
        .execute(&pool)
        .await?;

    tracing::info!(username, %role, "user created");
    Ok(())
}
