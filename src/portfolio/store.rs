//! Strict load / atomic save for the portfolio document.
//!
//! Load failures are loud on purpose: a missing or unparseable document
//! must never be coerced into an empty one, or the next save would wipe
//! real content after a transient read glitch.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Portfolio;

/// Failures surfaced by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("portfolio document not found at {path}")]
    NotFound { path: PathBuf },
    #[error("portfolio document at {path} is not a valid portfolio tree")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("portfolio document could not be serialized")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[error("portfolio document I/O failure at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result returned after persisting the document.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub hash: String,
}

/// Read/write access to the single portfolio JSON document.
#[derive(Debug, Clone)]
pub struct PortfolioStore {
    path: PathBuf,
}

impl PortfolioStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document. Missing and unparseable files are hard errors,
    /// never an empty default.
    pub fn load(&self) -> Result<Portfolio, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound {
                path: self.path.clone(),
            });
        }
        let data = fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Persists the document, writing to a sibling temp file and renaming
    /// over the target so a crash cannot leave a partial document behind.
    pub fn save(&self, portfolio: &Portfolio) -> Result<SaveOutcome, StoreError> {
        let payload =
            serde_json::to_vec_pretty(portfolio).map_err(|source| StoreError::Encode { source })?;
        let hash = compute_hash(&payload);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let staging = self.staging_path();
        fs::write(&staging, &payload).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(SaveOutcome {
            path: self.path.clone(),
            hash,
        })
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Lowercase hex SHA-256 of the provided bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}
