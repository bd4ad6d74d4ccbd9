use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Identifier already registered")]
    AlreadyExists,

    #[error("Invalid credentials. {attempts_remaining} attempts remaining before lock")]
    InvalidCredentials { attempts_remaining: u32 },

    #[error("Account is locked. Try again in {minutes_remaining} minutes")]
    Locked { minutes_remaining: i64 },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            e @ ServiceError::AlreadyExists => AppError::BadRequest(anyhow::anyhow!("{}", e)),
            e @ ServiceError::InvalidCredentials { .. } => {
                AppError::BadRequest(anyhow::anyhow!("{}", e))
            }
            e @ ServiceError::Locked { .. } => AppError::Forbidden(anyhow::anyhow!("{}", e)),
            ServiceError::Unauthenticated => {
                AppError::Unauthorized(anyhow::anyhow!("Authentication required"))
            }
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
