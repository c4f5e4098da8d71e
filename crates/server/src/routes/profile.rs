//! Profile route handlers: view, update (multipart photo upload),
//! photo removal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{AnyRole, RequireRole, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::services::uploads::DEFAULT_PHOTO;
use crate::state::AppState;

use super::{redirect_with_err, redirect_with_msg};

/// Query parameters for message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub user: CurrentUser,
    pub profile: User,
    pub msg: Option<String>,
    pub err: Option<String>,
}

/// Display the profile page with the user's stored record.
pub async fn show(
    auth: RequireRole<AnyRole>,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<ProfileTemplate, AppError> {
    let profile = AuthService::new(state.pool()).get_user(auth.user.id).await?;

    Ok(ProfileTemplate {
        user: auth.user,
        profile,
        msg: query.msg,
        err: query.err,
    })
}

/// Update the display name and/or profile photo.
///
/// The form is multipart: an optional `foto` file part and an optional
/// `name` text part. A replaced photo's old file is deleted unless it
/// is the placeholder. The session copy of name/photo is refreshed so
/// the navbar updates immediately.
pub async fn update(
    auth: RequireRole<AnyRole>,
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut new_name: Option<String> = None;
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !value.trim().is_empty() {
                    new_name = Some(value);
                }
            }
            Some("foto") => {
                let file_name = field.file_name().map(ToOwned::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if let Some(file_name) = file_name
                    && !bytes.is_empty()
                {
                    uploaded = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    let new_photo = match uploaded {
        Some((file_name, bytes)) => match state.photos().save(&file_name, &bytes).await {
            Ok(filename) => Some(filename),
            Err(e) => {
                tracing::warn!("photo upload failed: {e}");
                return Ok(redirect_with_err("/perfil", "Error"));
            }
        },
        None => None,
    };

    let auth_service = AuthService::new(state.pool());
    let previous = auth_service.get_user(auth.user.id).await?;

    let updated = auth_service
        .update_profile(auth.user.id, new_name.as_deref(), new_photo.as_deref())
        .await?;

    // The old file only after the record points at the new one.
    if new_photo.is_some()
        && previous.photo != updated.photo
        && let Err(e) = state.photos().delete(&previous.photo).await
    {
        tracing::warn!(photo = %previous.photo, "failed to delete replaced photo: {e}");
    }

    if let Err(e) = set_current_user(&session, &CurrentUser::from(&updated)).await {
        tracing::error!("Failed to refresh session: {}", e);
    }

    Ok(redirect_with_msg("/perfil", "Actualizado"))
}

/// Remove the uploaded photo and fall back to the placeholder.
pub async fn delete_photo(
    auth: RequireRole<AnyRole>,
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let auth_service = AuthService::new(state.pool());
    let current = auth_service.get_user(auth.user.id).await?;

    if current.photo != DEFAULT_PHOTO {
        if let Err(e) = state.photos().delete(&current.photo).await {
            tracing::warn!(photo = %current.photo, "failed to delete photo: {e}");
        }

        let updated = auth_service
            .update_profile(auth.user.id, None, Some(DEFAULT_PHOTO))
            .await?;

        if let Err(e) = set_current_user(&session, &CurrentUser::from(&updated)).await {
            tracing::error!("Failed to refresh session: {}", e);
        }
    }

    Ok(redirect_with_msg("/perfil", "Foto eliminada"))
}
