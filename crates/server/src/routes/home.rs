//! Home page: catalog listing, money totals, stock by category.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{AnyRole, RequireRole};
use crate::models::{CategoryStock, CurrentUser, ProductListing};
use crate::services::ReportingService;
use crate::services::reporting::SalesTotals;
use crate::state::AppState;

/// Query parameters for the home page.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Case-insensitive substring filter on product names.
    pub q: Option<String>,
    /// Success message from a completed workflow redirect.
    pub msg: Option<String>,
    /// Error message from a failed workflow redirect.
    pub err: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub user: CurrentUser,
    pub products: Vec<ProductListing>,
    pub totals: SalesTotals,
    pub stock_by_category: Vec<CategoryStock>,
    pub query: String,
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Display the catalog with totals and the stock-by-category summary.
pub async fn home(
    auth: RequireRole<AnyRole>,
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<HomeTemplate, AppError> {
    let reporting = ReportingService::new(state.pool());

    let products = crate::db::CatalogRepository::new(state.pool())
        .list_products(query.q.as_deref())
        .await?;
    let totals = reporting.sales_totals().await?;
    let stock_by_category = reporting.stock_by_category().await?;

    Ok(HomeTemplate {
        user: auth.user,
        products,
        totals,
        stock_by_category,
        query: query.q.unwrap_or_default(),
        msg: query.msg,
        err: query.err,
    })
}
