//! Authentication and authorization extractors.
//!
//! Instead of one near-duplicate middleware per role combination, a
//! single generic extractor checks the session against an explicit
//! allowed-role set carried by a zero-sized policy type.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use bodega_core::Role;

use crate::error::ErrorPageTemplate;
use crate::models::{CurrentUser, session_keys};

/// An allowed-role set evaluated per route.
pub trait RolePolicy: Send + Sync + 'static {
    /// Roles that may pass this check.
    const ALLOWED: &'static [Role];

    /// Message rendered on the 403 page when the check fails.
    const DENIED_MESSAGE: &'static str;

    /// Whether `role` is in the allowed set.
    #[must_use]
    fn allows(role: Role) -> bool {
        Self::ALLOWED.contains(&role)
    }
}

/// Any authenticated user.
pub struct AnyRole;

impl RolePolicy for AnyRole {
    const ALLOWED: &'static [Role] = &[Role::Administrator, Role::StockKeeper, Role::Seller];
    const DENIED_MESSAGE: &'static str = "Acceso denegado.";
}

/// Administrators only.
pub struct AdminOnly;

impl RolePolicy for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Administrator];
    const DENIED_MESSAGE: &'static str = "Acceso denegado. Solo Administradores.";
}

/// Stock management: administrators and stock keepers.
pub struct StockAccess;

impl RolePolicy for StockAccess {
    const ALLOWED: &'static [Role] = &[Role::Administrator, Role::StockKeeper];
    const DENIED_MESSAGE: &'static str = "Acceso denegado. Se requiere rol de Almacenista.";
}

/// Selling: administrators and sellers.
pub struct SellAccess;

impl RolePolicy for SellAccess {
    const ALLOWED: &'static [Role] = &[Role::Administrator, Role::Seller];
    const DENIED_MESSAGE: &'static str = "Acceso denegado. Se requiere rol de Vendedor.";
}

/// Extractor that requires a logged-in user whose role satisfies `P`.
///
/// # Example
///
/// ```rust,ignore
/// async fn restock_form(
///     auth: RequireRole<StockAccess>,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.name)
/// }
/// ```
pub struct RequireRole<P: RolePolicy> {
    /// The authenticated user.
    pub user: CurrentUser,
    _policy: PhantomData<P>,
}

/// Error returned when authentication or authorization fails.
pub enum AuthRejection {
    /// Not logged in: redirect to the login page.
    RedirectToLogin,
    /// Logged in with the wrong role: render a 403 page.
    Forbidden(&'static str),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorPageTemplate {
                    message: message.to_owned(),
                },
            )
                .into_response(),
        }
    }
}

impl<S, P> FromRequestParts<S> for RequireRole<P>
where
    S: Send + Sync,
    P: RolePolicy,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::RedirectToLogin)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::RedirectToLogin)?;

        if !P::allows(user.role) {
            return Err(AuthRejection::Forbidden(P::DENIED_MESSAGE));
        }

        Ok(Self {
            user,
            _policy: PhantomData,
        })
    }
}

/// Helper to set the current user in the session after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_role_allows_everyone() {
        for role in [Role::Administrator, Role::StockKeeper, Role::Seller] {
            assert!(AnyRole::allows(role));
        }
    }

    #[test]
    fn test_admin_only_set() {
        assert!(AdminOnly::allows(Role::Administrator));
        assert!(!AdminOnly::allows(Role::StockKeeper));
        assert!(!AdminOnly::allows(Role::Seller));
    }

    #[test]
    fn test_stock_access_set() {
        assert!(StockAccess::allows(Role::Administrator));
        assert!(StockAccess::allows(Role::StockKeeper));
        assert!(!StockAccess::allows(Role::Seller));
    }

    #[test]
    fn test_sell_access_set() {
        assert!(SellAccess::allows(Role::Administrator));
        assert!(!SellAccess::allows(Role::StockKeeper));
        assert!(SellAccess::allows(Role::Seller));
    }
}
