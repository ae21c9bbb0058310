//! Request and response types for the service flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use chirpy_core::error::AppError;
use chirpy_core::types::id::UserId;
use chirpy_entity::user::User;

/// Email and password, as sent on sign-up and profile update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCredentials {
    /// Login email.
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email format")
    )]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Chirp creation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChirpRequest {
    /// Chirp text, stored verbatim.
    pub body: String,
}

/// Public view of a user. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Login email.
    pub email: String,
    /// Paid membership flag.
    pub is_chirpy_red: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email.clone(),
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Successful login: the user plus both tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// The authenticated user.
    #[serde(flatten)]
    pub user: UserResponse,
    /// Access token.
    pub token: String,
    /// Refresh token.
    pub refresh_token: String,
}

/// Response of a token refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// Fresh access token.
    pub token: String,
}

/// Event posted by the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolkaEvent {
    /// Event name, e.g. `user.upgraded`.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub data: PolkaEventData,
}

/// Payload of a payment provider event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolkaEventData {
    /// The user the event is about.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Runs `validator` rules and folds any failures into one validation error.
pub(crate) fn validate<T: Validate>(input: &T) -> Result<(), AppError> {
    input.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| match &e.message {
            Some(message) => message.to_string(),
            None => e.code.to_string(),
        })
        .collect();
    messages.sort();
    messages.dedup();
    AppError::validation(messages.join("; "))
}
