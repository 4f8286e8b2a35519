//! JWT inspection
//!
//! Tokens are decoded without verifying the signature. The client only needs
//! the `exp` claim to decide whether a stored session is still usable; the
//! server remains the authority on validity.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Claims read from a token payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry as seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
    /// Subject (user id)
    #[serde(default)]
    pub sub: Option<String>,
    /// User email
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

impl TokenClaims {
    /// Expiry as a timestamp, when the token carries one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Best label for the signed-in user
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.sub.as_deref())
    }
}

/// Why a token could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("expected 3 segments, found {0}")]
    Segments(usize),

    #[error("payload is not valid base64")]
    Encoding,

    #[error("payload is not a JSON claims object: {0}")]
    Claims(String),
}

/// State of a stored token at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// Present, decodable and not expired
    Valid(TokenClaims),
    /// No token stored
    Missing,
    /// Present but undecodable
    Malformed(String),
    /// Present but past its `exp` claim
    Expired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
}

impl TokenStatus {
    /// Whether protected routes may be shown
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Whether a token exists on disk but cannot be used
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::Expired { .. })
    }
}

/// Decode the claims segment of a JWT
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Segments(segments.len()));
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| TokenError::Encoding)?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// Classify an optional token against `now`
pub fn inspect(token: Option<&str>, now: DateTime<Utc>) -> TokenStatus {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return TokenStatus::Missing;
    };

    let claims = match decode_claims(token) {
        Ok(claims) => claims,
        Err(e) => return TokenStatus::Malformed(e.to_string()),
    };

    match claims.exp {
        Some(exp) if exp <= now.timestamp() => TokenStatus::Expired {
            expired_at: claims.expires_at().unwrap_or(now),
        },
        _ => TokenStatus::Valid(claims),
    }
}

/// Build an unsigned token carrying `claims`, for tests and fixtures
#[doc(hidden)]
pub fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
