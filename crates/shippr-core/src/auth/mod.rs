//! # Authentication Module
//!
//! Handles the persisted session token.
//!
//! ## Components
//!
//! - [`CredentialStore`] - reads and writes `credentials.json`
//! - [`token`] - JWT claim decoding and expiry checks

mod credentials;
pub mod token;

pub use credentials::{CredentialStore, Credentials};
pub use token::{TokenClaims, TokenStatus};
