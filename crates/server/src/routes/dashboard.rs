//! Dashboard route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{AdminOnly, AnyRole, RequireRole};
use crate::models::{CurrentUser, ProductListing};
use crate::services::reporting::SalesTotals;
use crate::services::{ReportingService, StockService};
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: CurrentUser,
}

/// Administrator panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_panel.html")]
pub struct AdminPanelTemplate {
    pub user: CurrentUser,
    pub totals: SalesTotals,
    pub low_stock: Vec<ProductListing>,
}

/// Role-aware dashboard: the template shows the sections the user's
/// role can reach.
pub async fn dashboard(auth: RequireRole<AnyRole>) -> DashboardTemplate {
    DashboardTemplate { user: auth.user }
}

/// Administrator panel with totals and the low-stock list.
pub async fn admin_panel(
    auth: RequireRole<AdminOnly>,
    State(state): State<AppState>,
) -> Result<AdminPanelTemplate, AppError> {
    let totals = ReportingService::new(state.pool()).sales_totals().await?;
    let low_stock = StockService::new(state.pool()).low_stock().await?;

    Ok(AdminPanelTemplate {
        user: auth.user,
        totals,
        low_stock,
    })
}
