//! Product management route handlers: create and delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use bodega_core::ProductId;

use crate::db::catalog::{CatalogRepository, NewProduct};
use crate::error::AppError;
use crate::middleware::{AdminOnly, RequireRole, StockAccess};
use crate::models::{Category, CurrentUser};
use crate::state::AppState;

use super::{redirect_with_err, redirect_with_msg};

/// New-product form data. Numeric fields arrive as text so a bad value
/// can be re-rendered instead of rejected by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub nombre: String,
    pub precio: String,
    #[serde(default)]
    pub cantidad: String,
    #[serde(default, rename = "minStock")]
    pub min_stock: String,
    #[serde(default, rename = "maxStock")]
    pub max_stock: String,
    #[serde(rename = "categoriaID")]
    pub categoria_id: String,
}

/// New-product form template.
#[derive(Template, WebTemplate)]
#[template(path = "new_product.html")]
pub struct NewProductTemplate {
    pub user: CurrentUser,
    pub categories: Vec<Category>,
    pub form: ProductForm,
    pub err: Option<String>,
}

/// Display the new-product form.
pub async fn new_product_form(
    auth: RequireRole<StockAccess>,
    State(state): State<AppState>,
) -> Result<NewProductTemplate, AppError> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;

    Ok(NewProductTemplate {
        user: auth.user,
        categories,
        form: ProductForm::default(),
        err: None,
    })
}

/// Create a product.
///
/// Validation failure re-renders the form with the submitted values and
/// the error message.
pub async fn create_product(
    auth: RequireRole<StockAccess>,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let catalog = CatalogRepository::new(state.pool());

    match validate_product_form(&form) {
        Ok(new) => match catalog.create_product(&new).await {
            Ok(product) => {
                tracing::info!(product = %product.name, by = %auth.user.username, "product created");
                Ok(redirect_with_msg("/", "Producto creado").into_response())
            }
            Err(crate::db::RepositoryError::Conflict(message)) => {
                render_form_error(&catalog, auth.user, form, message).await
            }
            Err(e) => Err(e.into()),
        },
        Err(message) => render_form_error(&catalog, auth.user, form, message).await,
    }
}

/// Delete a product. Ledger snapshots referencing it are untouched.
pub async fn delete_product(
    auth: RequireRole<AdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Response, AppError> {
    match CatalogRepository::new(state.pool()).delete_product(id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, by = %auth.user.username, "product deleted");
            Ok(redirect_with_msg("/", "Producto eliminado").into_response())
        }
        Err(crate::db::RepositoryError::NotFound) => {
            Ok(redirect_with_err("/", "Error eliminar").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse and validate the submitted product fields.
fn validate_product_form(form: &ProductForm) -> Result<NewProduct, String> {
    let name = form.nombre.trim();
    if name.is_empty() {
        return Err("El nombre es obligatorio.".to_owned());
    }

    let price = form
        .precio
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|p| !p.is_sign_negative())
        .ok_or_else(|| "Precio inválido".to_owned())?;

    let quantity = parse_or_default(&form.cantidad, 0)?;
    let min_stock = parse_or_default(&form.min_stock, 5)?;
    let max_stock = parse_or_default(&form.max_stock, 100)?;

    if quantity < 0 || min_stock < 0 || max_stock < 1 {
        return Err("Cantidad inválida".to_owned());
    }
    if min_stock >= max_stock {
        return Err("El stock mínimo no puede ser mayor o igual al máximo.".to_owned());
    }

    let category_id = form
        .categoria_id
        .trim()
        .parse::<i32>()
        .map_err(|_| "Categoría inválida".to_owned())?;

    Ok(NewProduct {
        name: name.to_owned(),
        price,
        quantity,
        min_stock,
        max_stock,
        category_id: category_id.into(),
    })
}

/// Empty optional numeric fields fall back to the schema defaults.
fn parse_or_default(raw: &str, default: i32) -> Result<i32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse::<i32>().map_err(|_| "Cantidad inválida".to_owned())
}

async fn render_form_error(
    catalog: &CatalogRepository<'_>,
    user: CurrentUser,
    form: ProductForm,
    message: String,
) -> Result<Response, AppError> {
    let categories = catalog.list_categories().await?;

    Ok(NewProductTemplate {
        user,
        categories,
        form,
        err: Some(message),
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            nombre: "Refresco".to_owned(),
            precio: "18.50".to_owned(),
            cantidad: "10".to_owned(),
            min_stock: "5".to_owned(),
            max_stock: "20".to_owned(),
            categoria_id: "1".to_owned(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_input() {
        let new = validate_product_form(&form()).expect("valid");
        assert_eq!(new.name, "Refresco");
        assert_eq!(new.quantity, 10);
        assert_eq!(new.max_stock, 20);
    }

    #[test]
    fn test_validate_rejects_min_not_below_max() {
        let mut f = form();
        f.min_stock = "20".to_owned();
        let err = validate_product_form(&f).expect_err("invalid");
        assert_eq!(err, "El stock mínimo no puede ser mayor o igual al máximo.");
    }

    #[test]
    fn test_validate_defaults_empty_optional_fields() {
        let mut f = form();
        f.cantidad = String::new();
        f.min_stock = String::new();
        f.max_stock = String::new();
        let new = validate_product_form(&f).expect("valid");
        assert_eq!((new.quantity, new.min_stock, new.max_stock), (0, 5, 100));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut f = form();
        f.precio = "-1".to_owned();
        assert!(validate_product_form(&f).is_err());
    }
}
