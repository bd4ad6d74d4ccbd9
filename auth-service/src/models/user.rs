//! User model - registered account identities.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A registered account. The identifier (typically an email address) is the
/// unique, case-sensitive key of the credential store; `password_hash` holds
/// the salted Argon2id hash and is the only field that changes after
/// creation.
#[derive(Debug, Clone)]
pub struct User {
    pub identifier: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        identifier: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        Self {
            identifier,
            password_hash,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }

    /// Convert to sanitized response (no sensitive fields).
    pub fn sanitized(&self) -> SanitizedUser {
        SanitizedUser {
            identifier: self.identifier.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedUser {
    #[schema(example = "alice@example.com")]
    pub identifier: String,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "A")]
    pub last_name: String,
}
