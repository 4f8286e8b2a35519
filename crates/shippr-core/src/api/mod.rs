//! # API Client
//!
//! Client for the Shippr tRPC server.
//!
//! - [`ApiClient`] - query/mutate with retry, logging and token handling
//! - [`ApiError`] - classified failures
//! - [`procedures`] - typed calls such as `auth.login`

mod client;
mod error;
pub mod procedures;
mod retry;
mod types;

pub use client::{ApiClient, CallKind};
pub use error::{ApiError, ApiErrorKind, ApiResult, TrpcErrorData, TrpcErrorShape};
pub use retry::{with_retry, Attempted, RetryPolicy};
pub use types::{
    Acknowledgement, AuthPayload, CreateUserInput, LoginInput, Motd, RequestPasswordResetInput,
    ResetPasswordInput, User,
};
