//! Stock workflow route handlers: restock, sell, suggestions, daily reset.
//!
//! Handlers stay thin: parse the form, call the service, translate the
//! outcome into a redirect carrying a user-facing message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;

use bodega_core::ProductId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{AdminOnly, RequireRole, SellAccess, StockAccess};
use crate::models::{CurrentUser, Product, ProductListing};
use crate::services::stock::{StockError, parse_quantity};
use crate::services::{ReportingService, StockService};
use crate::state::AppState;

use super::{redirect_with_err, redirect_with_msg};

/// Restock form data. Quantities arrive as text and are validated by
/// the workflow's parser.
#[derive(Debug, Deserialize)]
pub struct RestockForm {
    #[serde(rename = "productoID")]
    pub producto_id: ProductId,
    #[serde(rename = "cantidadAgregar")]
    pub cantidad_agregar: String,
}

/// Sell form data.
#[derive(Debug, Deserialize)]
pub struct SellForm {
    pub cantidad: String,
}

/// Query parameters for message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Restock form template.
#[derive(Template, WebTemplate)]
#[template(path = "restock.html")]
pub struct RestockTemplate {
    pub user: CurrentUser,
    pub products: Vec<Product>,
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Low-stock suggestions template.
#[derive(Template, WebTemplate)]
#[template(path = "suggestions.html")]
pub struct SuggestionsTemplate {
    pub user: CurrentUser,
    pub products: Vec<ProductListing>,
}

/// Display the restock form, products sorted by name.
pub async fn restock_form(
    auth: RequireRole<StockAccess>,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<RestockTemplate, AppError> {
    let products = crate::db::CatalogRepository::new(state.pool())
        .list_products_by_name()
        .await?;

    Ok(RestockTemplate {
        user: auth.user,
        products,
        msg: query.msg,
        err: query.err,
    })
}

/// Apply a restock.
pub async fn restock(
    _auth: RequireRole<StockAccess>,
    State(state): State<AppState>,
    Form(form): Form<RestockForm>,
) -> Result<Redirect, AppError> {
    let quantity = match parse_quantity(&form.cantidad_agregar) {
        Ok(n) => n,
        Err(_) => return Ok(redirect_with_err("/productos/restock", "Cantidad inválida")),
    };

    match StockService::new(state.pool())
        .restock(form.producto_id, quantity)
        .await
    {
        Ok(receipt) => Ok(redirect_with_msg(
            "/productos/restock",
            &format!(
                "Agregadas {} unidades a {}",
                receipt.added, receipt.product_name
            ),
        )),
        Err(StockError::NotFound) => Ok(redirect_with_err(
            "/productos/restock",
            "Producto no encontrado",
        )),
        Err(StockError::LimitExceeded { max }) => Ok(redirect_with_err(
            "/productos/restock",
            &format!("Error: El stock superaría el máximo permitido ({max})."),
        )),
        Err(StockError::InvalidInput) => {
            Ok(redirect_with_err("/productos/restock", "Cantidad inválida"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Sell units of a product.
pub async fn sell(
    _auth: RequireRole<SellAccess>,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<SellForm>,
) -> Result<Redirect, AppError> {
    let quantity = match parse_quantity(&form.cantidad) {
        Ok(n) => n,
        Err(_) => return Ok(redirect_with_err("/", "Cantidad inválida")),
    };

    match StockService::new(state.pool()).sell(id, quantity).await {
        Ok(receipt) => Ok(redirect_with_msg(
            "/",
            &format!("Venta registrada. Total: ${:.2}", receipt.total.round_dp(2)),
        )),
        Err(StockError::NotFound) => Ok(redirect_with_err("/", "Producto no existe")),
        Err(StockError::InsufficientStock { .. }) => {
            Ok(redirect_with_err("/", "Stock insuficiente"))
        }
        Err(StockError::InvalidInput) => Ok(redirect_with_err("/", "Cantidad inválida")),
        Err(e) => Err(e.into()),
    }
}

/// Low-stock suggestions page.
pub async fn suggestions(
    auth: RequireRole<StockAccess>,
    State(state): State<AppState>,
) -> Result<SuggestionsTemplate, AppError> {
    let products = StockService::new(state.pool()).low_stock().await?;

    Ok(SuggestionsTemplate {
        user: auth.user,
        products,
    })
}

/// Reset the daily totals baseline to now.
pub async fn reset_daily(
    auth: RequireRole<AdminOnly>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    ReportingService::new(state.pool()).reset_daily().await?;

    tracing::info!(by = %auth.user.username, "daily counter reset requested");
    Ok(redirect_with_msg("/", "Contador diario reiniciado a 0"))
}
