//! Authentication route handlers: login, logout, one-time setup.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::services::auth::{AuthError, SETUP_USERNAME, SetupOutcome};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Query parameters for message display on the login page.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        msg: query.msg,
        err: query.err,
    }
}

/// Handle login form submission.
///
/// A failed attempt re-renders the login page with a generic message
/// that does not distinguish a missing user from a wrong password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                return Ok(super::redirect_with_err("/login", "Error de sesión").into_response());
            }

            tracing::info!(username = %user.username, role = %user.role, "user logged in");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username.trim(), "login failed");
            Ok(LoginTemplate {
                msg: None,
                err: Some("Datos incorrectos".to_owned()),
            }
            .into_response())
        }
        Err(e) => Err(AppError::Auth(e)),
    }
}

/// Handle logout: drop the session and return to the login page.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/login")
}

/// One-time setup: create the default administrator account.
///
/// Idempotent; if the account already exists nothing is created.
pub async fn setup(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let outcome = AuthService::new(state.pool()).setup_default_admin().await?;

    Ok(match outcome {
        SetupOutcome::Created => {
            tracing::info!(username = SETUP_USERNAME, "default administrator created");
            "Admin creado"
        }
        SetupOutcome::AlreadyExists => "Admin ya existe",
    })
}
