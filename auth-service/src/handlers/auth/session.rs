use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{
        auth::{LoginRequest, LoginResponse},
        ErrorResponse, MessageResponse,
    },
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

/// Login with identifier and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials, with remaining-attempts text", body = ErrorResponse),
        (status = 403, description = "Account locked, with remaining-minutes text", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.auth.login(req)?;
    Ok((StatusCode::OK, Json(res)))
}

/// Logout and revoke the presented session token
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Logged out successfully", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    state.auth.logout(&user.0);

    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Successfully logged out".to_string(),
        }),
    )
}
