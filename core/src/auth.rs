//! Login form handling

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ids::UserId;
use crate::Result;

/// Validated login credentials, the body of `POST /login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Trim both fields and require them to be non-empty.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::validation("Username and password are required."));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// User returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: SessionUser,
}
