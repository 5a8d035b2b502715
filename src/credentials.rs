//! Local persistence of the API token/key pair.
//!
//! The credential is stored as plain JSON (`{"token": ..., "key": ...}`) in a
//! single file. The file is neither encrypted nor permission-hardened.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CREDENTIALS_FILE_NAME: &str = "credentials.json";

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("failed to read credentials from {path:?}: {cause}")]
    ReadError {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("failed to write credentials to {path:?}: {cause}")]
    WriteError {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// An API token together with its secret key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    token: String,
    key: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            key: key.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Both parts must be present for the credential to be usable
    pub fn is_complete(&self) -> bool {
        !self.token.trim().is_empty() && !self.key.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// File-backed store holding the last known credential
#[derive(Debug, Clone)]
pub struct CredentialStore {
    file_path: PathBuf,
}

impl CredentialStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Load the stored credential.
    ///
    /// A missing file yields `None`. So does a file that cannot be parsed or
    /// that holds an empty token or key, since the user will be asked for a
    /// fresh pair in both cases.
    pub fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(cause) if cause.kind() == ErrorKind::NotFound => {
                debug!("No credentials stored at {:?}", self.file_path);
                return Ok(None);
            }
            Err(cause) => {
                return Err(CredentialStoreError::ReadError {
                    path: self.file_path.clone(),
                    cause,
                })
            }
        };

        match serde_json::from_str::<Credential>(&content) {
            Ok(credential) if credential.is_complete() => Ok(Some(credential)),
            Ok(_) => {
                warn!("Stored credentials at {:?} are incomplete", self.file_path);
                Ok(None)
            }
            Err(e) => {
                warn!("Ignoring unreadable credentials file {:?}: {}", self.file_path, e);
                Ok(None)
            }
        }
    }

    /// Overwrite the stored credential, creating the parent directory if needed.
    pub fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|cause| CredentialStoreError::WriteError {
                path: self.file_path.clone(),
                cause,
            })?;
        }

        let content = serde_json::to_string_pretty(credential)?;
        fs::write(&self.file_path, content).map_err(|cause| CredentialStoreError::WriteError {
            path: self.file_path.clone(),
            cause,
        })?;
        debug!("Saved credentials to {:?}", self.file_path);

        Ok(())
    }
}
