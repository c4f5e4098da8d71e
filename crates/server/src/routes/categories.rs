//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::db::{CatalogRepository, RepositoryError};
use crate::error::AppError;
use crate::middleware::{AnyRole, RequireRole, StockAccess};
use crate::models::{Category, CurrentUser};
use crate::state::AppState;

use super::redirect_with_msg;

/// New-category form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
}

/// Query parameters for message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate {
    pub user: CurrentUser,
    pub categories: Vec<Category>,
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// New-category form template.
#[derive(Template, WebTemplate)]
#[template(path = "new_category.html")]
pub struct NewCategoryTemplate {
    pub user: CurrentUser,
    pub form: CategoryForm,
    pub err: Option<String>,
}

/// Display all categories.
pub async fn index(
    auth: RequireRole<AnyRole>,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<CategoriesTemplate, AppError> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;

    Ok(CategoriesTemplate {
        user: auth.user,
        categories,
        msg: query.msg,
        err: query.err,
    })
}

/// Display the new-category form.
pub async fn new_category_form(auth: RequireRole<StockAccess>) -> NewCategoryTemplate {
    NewCategoryTemplate {
        user: auth.user,
        form: CategoryForm::default(),
        err: None,
    }
}

/// Create a category.
///
/// A duplicate or empty name re-renders the form with the submitted
/// values.
pub async fn create_category(
    auth: RequireRole<StockAccess>,
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let name = form.nombre.trim();
    if name.is_empty() {
        return Ok(NewCategoryTemplate {
            user: auth.user,
            form,
            err: Some("El nombre de la categoría es obligatorio.".to_owned()),
        }
        .into_response());
    }

    let description = Some(form.descripcion.as_str()).filter(|d| !d.trim().is_empty());

    match CatalogRepository::new(state.pool())
        .create_category(name, description)
        .await
    {
        Ok(category) => {
            tracing::info!(category = %category.name, by = %auth.user.username, "category created");
            Ok(redirect_with_msg("/categorias", "Creada").into_response())
        }
        Err(RepositoryError::Conflict(_)) => Ok(NewCategoryTemplate {
            user: auth.user,
            form,
            err: Some("Error".to_owned()),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}
