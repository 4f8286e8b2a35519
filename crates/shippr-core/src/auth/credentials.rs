//! # Credentials Storage
//!
//! Persists the session token as `{ "token": "..." }` in the Shippr home
//! directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::token::{self, TokenStatus};
use crate::error::{Error, Result};

/// Contents of the credential file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Session token issued by the API.
    pub token: String,
}

/// File-backed store for [`Credentials`].
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the credential file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the credential file. A missing file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| Error::credentials(format!("{}: {e}", self.path.display())))
    }

    /// The stored token, if one can be read.
    pub fn token(&self) -> Option<String> {
        match self.load() {
            Ok(creds) => creds.map(|c| c.token),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable credential file");
                None
            }
        }
    }

    /// Writes `token` to disk, creating the parent directory if needed.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&Credentials {
            token: token.to_string(),
        })?;
        // staged with owner-only mode, then renamed over the target
        let staging = self.path.with_extension("json.tmp");
        match fs::remove_file(&staging) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        let mut file = private_file_options().open(&staging)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, &self.path)?;

        info!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }

    /// Deletes the credential file. Deleting a missing file succeeds.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Cleared credentials");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No credentials to clear");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Classifies the stored token at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> TokenStatus {
        match self.load() {
            Ok(creds) => token::inspect(creds.as_ref().map(|c| c.token.as_str()), now),
            Err(Error::Io(e)) => {
                warn!(path = %self.path.display(), error = %e, "Could not read credentials");
                TokenStatus::Missing
            }
            Err(e) => TokenStatus::Malformed(e.to_string()),
        }
    }
}

/// Options creating a new file readable by the owner only
fn private_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}
