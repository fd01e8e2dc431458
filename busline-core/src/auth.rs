use std::sync::Arc;

use busline_shared::models::events::{DomainEvent, UserRegisteredEvent};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::events::EventPublisher;
use crate::identity::{Credentials, SignupRequest, StoredUser, User};
use crate::password::{hash_password, verify_password};
use crate::repository::{SessionStore, UserRepository};
use crate::validation::{self, ValidationErrors};
use crate::{CoreError, CoreResult};

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Signup, login and the current session
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    events: Arc<dyn EventPublisher>,
    min_password_length: usize,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            users,
            sessions,
            events,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }

    pub fn with_min_password_length(mut self, min_password_length: usize) -> Self {
        self.min_password_length = min_password_length;
        self
    }

    pub async fn signup(&self, request: SignupRequest) -> CoreResult<User> {
        let email = request.email.trim().to_string();
        let mobile = validation::normalize_mobile(&request.mobile);

        let mut errors = ValidationErrors::new();
        validation::check_email(&mut errors, "email", &email);
        validation::check_password(&mut errors, "password", request.password.as_inner(), self.min_password_length);
        errors.check(
            validation::is_valid_name(&request.name),
            "name",
            "Please enter a valid name (letters only)",
        );
        validation::check_mobile(&mut errors, "mobile", &mobile);
        errors.into_result()?;

        if self.users.find_by_email(&email).await.map_err(CoreError::storage)?.is_some() {
            warn!("Signup rejected, email already registered: {}", email);
            return Err(CoreError::EmailTaken(email));
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            name: request.name.trim().to_string(),
            mobile,
            gender: request.gender,
            created_at: Utc::now(),
        };
        let stored = StoredUser {
            user: user.clone(),
            password_hash: hash_password(request.password.as_inner())?,
        };

        self.users.insert_user(&stored).await.map_err(CoreError::storage)?;
        self.sessions.set_current_user(&user).await.map_err(CoreError::storage)?;
        info!("Registered user {} ({})", user.id, user.email);

        let event = DomainEvent::UserRegistered(UserRegisteredEvent {
            user_id: user.id,
            gender: user.gender,
            timestamp: Utc::now().timestamp(),
        });
        if let Err(e) = self.events.publish(event).await {
            warn!("Failed to publish registration event: {}", e);
        }

        Ok(user)
    }

    pub async fn login(&self, credentials: Credentials) -> CoreResult<User> {
        let email = credentials.email.trim();

        let mut errors = ValidationErrors::new();
        validation::check_email(&mut errors, "email", email);
        validation::check_password(&mut errors, "password", credentials.password.as_inner(), self.min_password_length);
        errors.into_result()?;

        let stored = self
            .users
            .find_by_email(email)
            .await
            .map_err(CoreError::storage)?
            .ok_or(CoreError::InvalidCredentials)?;

        if !verify_password(credentials.password.as_inner(), &stored.password_hash)? {
            warn!("Failed login for {}", email);
            return Err(CoreError::InvalidCredentials);
        }

        let user = stored.user();
        self.sessions.set_current_user(&user).await.map_err(CoreError::storage)?;
        info!("User {} logged in", user.id);
        Ok(user)
    }

    pub async fn logout(&self) -> CoreResult<()> {
        self.sessions.clear().await.map_err(CoreError::storage)?;
        info!("Session cleared");
        Ok(())
    }

    pub async fn current_user(&self) -> CoreResult<Option<User>> {
        self.sessions.current_user().await.map_err(CoreError::storage)
    }

    /// The signed-in user, or `NotAuthenticated`
    pub async fn require_user(&self) -> CoreResult<User> {
        self.current_user().await?.ok_or(CoreError::NotAuthenticated)
    }
}
