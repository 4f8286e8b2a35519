//! Typed wrappers for the procedures the client uses

use super::client::ApiClient;
use super::error::ApiResult;
use super::types::{
    Acknowledgement, AuthPayload, CreateUserInput, LoginInput, Motd, RequestPasswordResetInput,
    ResetPasswordInput,
};

/// `auth.login`
pub const LOGIN: &str = "auth.login";
/// `auth.createUser`
pub const CREATE_USER: &str = "auth.createUser";
/// `auth.requestPasswordReset`
pub const REQUEST_PASSWORD_RESET: &str = "auth.requestPasswordReset";
/// `auth.resetPassword`
pub const RESET_PASSWORD: &str = "auth.resetPassword";
/// `user.refresh`
pub const USER_REFRESH: &str = "user.refresh";
/// `motd.getRandom`
pub const MOTD_RANDOM: &str = "motd.getRandom";

impl ApiClient {
    /// Exchanges email and password for a session token.
    pub async fn login(&self, input: &LoginInput) -> ApiResult<AuthPayload> {
        self.mutate(LOGIN, input).await
    }

    /// Registers a new account and starts a session.
    pub async fn create_user(&self, input: &CreateUserInput) -> ApiResult<AuthPayload> {
        self.mutate(CREATE_USER, input).await
    }

    /// Sends a password reset code to `input.email`.
    pub async fn request_password_reset(
        &self,
        input: &RequestPasswordResetInput,
    ) -> ApiResult<Acknowledgement> {
        self.mutate(REQUEST_PASSWORD_RESET, input).await
    }

    /// Sets a new password using a reset code.
    pub async fn reset_password(&self, input: &ResetPasswordInput) -> ApiResult<Acknowledgement> {
        self.mutate(RESET_PASSWORD, input).await
    }

    /// Renews the current session and returns the user.
    pub async fn refresh_user(&self) -> ApiResult<AuthPayload> {
        self.mutate(USER_REFRESH, &()).await
    }

    /// Fetches a random message of the day.
    pub async fn random_motd(&self) -> ApiResult<Motd> {
        self.query(MOTD_RANDOM, &()).await
    }
}
