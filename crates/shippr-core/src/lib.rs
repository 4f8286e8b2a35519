//! # shippr
//!
//! Terminal client for the shippr platform.
//!
//! The client talks to the shippr tRPC server, keeps the session token on
//! disk and drives a small set of account screens in the terminal.
//!
//! ## Architecture
//!
//! - **Router**: navigation stack with an auth guard on protected routes
//! - **API**: tRPC wire client with retry, error classification and call logging
//! - **Auth**: credential file and unverified JWT claim inspection
//! - **TUI**: ratatui screens for welcome, login, sign-up, password reset and dashboard
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the terminal UI
//! shippr
//!
//! # Check the stored session
//! shippr status
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod tui;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::api::{ApiClient, ApiError, ApiErrorKind, RetryPolicy};
    pub use crate::auth::{CredentialStore, TokenStatus};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::router::{RouteEntry, RouteName, Router};
}
