use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::SanitizedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    #[schema(example = "alice@example.com")]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Str0ng!Pass")]
    pub password: String,

    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Alice")]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "A")]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    #[schema(example = "alice@example.com")]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Str0ng!Pass")]
    pub password: String,
}

/// Session token plus the public profile, returned on successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub token: String,
    pub user: SanitizedUser,
}
