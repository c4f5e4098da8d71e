//! HTTP route handlers.
//!
//! Liveness (`/health`) and readiness (`/health/ready`) live in `main`.
//!
//! # Route Structure
//!
//! ```text
//! # Home
//! GET  /                           - Catalog, money totals, stock by category
//!
//! # Auth
//! GET  /login                      - Login page
//! POST /login                      - Login action
//! GET  /logout                     - Logout
//! GET  /setup                      - One-time default administrator creation
//!
//! # Dashboard
//! GET  /dashboard                  - Role-aware dashboard
//! GET  /admin/panel                - Administrator panel
//!
//! # Stock workflow
//! GET  /productos/restock          - Restock form (stock keepers, admins)
//! POST /productos/restock          - Apply a restock
//! POST /productos/vender/{id}      - Sell units of a product (sellers, admins)
//! GET  /sugerencias                - Low-stock suggestions
//! POST /ventas/reset-dia           - Reset the daily totals baseline (admins)
//!
//! # Catalog management
//! GET  /productos/crear            - New product form (stock keepers, admins)
//! POST /productos/crear            - Create a product
//! POST /productos/eliminar/{id}    - Delete a product (admins)
//! GET  /categorias                 - Category listing
//! GET  /categorias/crear           - New category form (stock keepers, admins)
//! POST /categorias/crear           - Create a category
//!
//! # Profile
//! GET  /perfil                     - Profile page
//! POST /perfil/actualizar          - Update display name / photo (multipart)
//! POST /perfil/eliminar-foto       - Remove the uploaded photo
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod home;
pub mod products;
pub mod profile;
pub mod stock;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Build a redirect whose target carries a success message (`?msg=`).
pub(crate) fn redirect_with_msg(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?msg={}", urlencoding::encode(message)))
}

/// Build a redirect whose target carries an error message (`?err=`).
pub(crate) fn redirect_with_err(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?err={}", urlencoding::encode(message)))
}

/// Create the stock workflow routes.
pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productos/restock",
            get(stock::restock_form).post(stock::restock),
        )
        .route("/productos/vender/{id}", post(stock::sell))
        .route("/sugerencias", get(stock::suggestions))
        .route("/ventas/reset-dia", post(stock::reset_daily))
}

/// Create the catalog management routes.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productos/crear",
            get(products::new_product_form).post(products::create_product),
        )
        .route("/productos/eliminar/{id}", post(products::delete_product))
        .route("/categorias", get(categories::index))
        .route(
            "/categorias/crear",
            get(categories::new_category_form).post(categories::create_category),
        )
}

/// Create the profile routes.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/perfil", get(profile::show))
        .route("/perfil/actualizar", post(profile::update))
        .route("/perfil/eliminar-foto", post(profile::delete_photo))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home
        .route("/", get(home::home))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/setup", get(auth::setup))
        // Dashboard
        .route("/dashboard", get(dashboard::dashboard))
        .route("/admin/panel", get(dashboard::admin_panel))
        // Feature groups
        .merge(stock_routes())
        .merge(catalog_routes())
        .merge(profile_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_messages_are_url_encoded() {
        let r = redirect_with_msg("/", "Venta registrada. Total: $12.50");
        let response = axum::response::IntoResponse::into_response(r);
        let location = response
            .headers()
            .get(axum::http::header::LOCATION)
            .expect("location header")
            .to_str()
            .expect("ascii");
        assert!(location.starts_with("/?msg="));
        assert!(!location.contains(' '));
    }
}
