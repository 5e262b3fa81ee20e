use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::policy::Role;
use crate::users::repo::User;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user creation; also the registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub persona: Option<String>,
}

impl CreateUserRequest {
    /// Request-shape validation, run before the directory is invoked.
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.email = self.email.trim().to_lowercase();
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name must not be empty".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("Invalid email".into()));
        }
        if self.password.len() < 8 {
            return Err(AppError::Validation("Password too short".into()));
        }
        Ok(())
    }
}

/// Partial update payload; absent fields keep the previous value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub persona: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(email) = &mut self.email {
            *email = email.trim().to_lowercase();
            if !is_valid_email(email) {
                return Err(AppError::Validation("Invalid email".into()));
            }
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name must not be empty".into()));
            }
        }
        if let Some(password) = &self.password {
            if password.len() < 8 {
                return Err(AppError::Validation("Password too short".into()));
            }
        }
        Ok(())
    }
}

/// Public part of a user returned to clients; the password hash never leaves
/// the backend.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub persona: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id_user,
            role: u.role,
            name: u.name,
            email: u.email,
            persona: u.persona,
            created_at: u.created_at,
            updated_at: u.updated_at,
            is_active: u.is_active,
        }
    }
}
