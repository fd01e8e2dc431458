pub mod events;
pub mod search;
pub mod repository;
pub mod identity;
pub mod payment;
pub mod booking;
pub mod validation;
pub mod password;
pub mod auth;

pub use auth::AuthService;
pub use booking::{Booking, Passenger};
pub use identity::{Credentials, SignupRequest, StoredUser, User};
pub use search::SearchFilters;
pub use validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(ValidationErrors),
    #[error("An account with email {0} already exists")]
    EmailTaken(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please log in to continue")]
    NotAuthenticated,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl CoreError {
    pub fn storage(err: repository::StoreError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::ValidationError(errors)
    }
}

impl From<argon2::password_hash::Error> for CoreError {
    fn from(err: argon2::password_hash::Error) -> Self {
        CoreError::InternalError(format!("Password hashing failed: {}", err))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
