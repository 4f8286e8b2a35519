//! # API Types
//!
//! Inputs and outputs of the tRPC procedures the client calls.

use serde::{Deserialize, Serialize};

/// Input of `auth.login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Input of `auth.createUser`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
}

/// Input of `auth.requestPasswordReset`.
#[derive(Debug, Clone, Serialize)]
pub struct RequestPasswordResetInput {
    /// Email to send the reset code to.
    pub email: String,
}

/// Input of `auth.resetPassword`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordInput {
    /// Account email.
    pub email: String,
    /// Code received by email.
    pub code: String,
    /// New password.
    pub password: String,
}

/// A user as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    #[serde(default)]
    pub id: Option<String>,
    /// Account email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Best label for display.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Output of the procedures that start or renew a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthPayload {
    /// Fresh session token.
    pub token: String,
    /// The signed-in user, when the server includes it.
    #[serde(default)]
    pub user: Option<User>,
}

/// Output of procedures that only acknowledge a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Acknowledgement {
    /// Optional message for the user.
    #[serde(default)]
    pub message: Option<String>,
}

/// Output of `motd.getRandom`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Motd {
    /// The message.
    pub message: String,
    /// Who said it.
    #[serde(default)]
    pub author: Option<String>,
}
