//! Text-generation port and its backends.
//!
//! Everything above this module talks to [`TextGenerator`] only; which
//! backend answers is decided by configuration via [`from_settings`].

pub mod hosted;
pub mod ollama;

pub use hosted::HostedClient;
pub use ollama::OllamaClient;

use crate::workspace::config::LlmSettings;
use anyhow::{bail, Result};
use thiserror::Error;

/// Tuning knobs forwarded to the backend on every call.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

impl GenerateOptions {
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Failures a backend can report. "No content" is not among them: an
/// empty `Ok` string is valid and callers treat it as extraction
/// failure, not a backend fault.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("text backend unreachable: {0}")]
    Unavailable(String),
    #[error("text backend timed out")]
    Timeout,
    #[error("text backend returned an error (HTTP {status}): {detail}")]
    Remote { status: u16, detail: String },
}

/// The single capability the edit pipeline needs from a model backend.
pub trait TextGenerator {
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, GenerateError>;

    /// Cheap reachability probe used at startup. Backends without one
    /// report available.
    fn is_available(&self) -> bool {
        true
    }
}

/// Builds the backend selected in settings.
pub fn from_settings(settings: &LlmSettings) -> Result<Box<dyn TextGenerator>> {
    match settings.provider.as_str() {
        "ollama" => Ok(Box::new(OllamaClient::from_settings(settings)?)),
        "hosted" => Ok(Box::new(HostedClient::from_settings(settings)?)),
        other => bail!("Unknown text backend '{}'", other),
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Unavailable(err.to_string())
    }
}
