use busline_shared::{Gender, Masked};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account as seen by the booking flow. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub mobile: String,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
}

/// Account as persisted by a `UserRepository`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    pub password_hash: String,
}

impl StoredUser {
    pub fn user(&self) -> User {
        self.user.clone()
    }
}

/// Signup form
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: Masked<String>,
    pub name: String,
    pub mobile: String,
    pub gender: Gender,
}

/// Login form
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: Masked<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Masked(password.into()),
        }
    }
}
