use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{dtos::ErrorResponse, middleware::AuthUser, models::SanitizedUser, AppState};

/// Current account profile
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile of the authenticated account", body = SanitizedUser),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;

    let profile = state
        .auth
        .profile(&claims.sub)
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Authentication required")))?;

    Ok(Json(profile))
}
