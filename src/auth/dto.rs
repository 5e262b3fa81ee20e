use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}
