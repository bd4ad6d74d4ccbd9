use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{auth::RegisterRequest, ErrorResponse, MessageResponse},
    utils::ValidatedJson,
    AppState,
};

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered successfully", body = MessageResponse),
        (status = 400, description = "Validation failed or identifier already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.register_account(req)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful".to_string(),
        }),
    ))
}
