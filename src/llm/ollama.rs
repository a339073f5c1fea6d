use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use super::{transport_error, GenerateError, GenerateOptions, TextGenerator};
use crate::workspace::config::LlmSettings;

const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend for a local Ollama server (`POST /api/generate`).
pub struct OllamaClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for Ollama backend")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Self::new(
            settings.base_url.trim_end_matches('/'),
            settings.model.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Lists the models the server reports via `GET /api/tags`.
    pub fn available_models(&self) -> Result<Vec<String>, GenerateError> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(AVAILABILITY_TIMEOUT)
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Remote {
                status: status.as_u16(),
                detail: response.text().unwrap_or_default().trim().to_string(),
            });
        }
        let json: Value = response.json().map_err(|err| GenerateError::Remote {
            status: status.as_u16(),
            detail: format!("malformed tag listing: {err}"),
        })?;
        let models = json
            .get("models")
            .and_then(|m| m.as_array())
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(models)
    }
}

impl TextGenerator for OllamaClient {
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, GenerateError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": options.temperature,
                "num_predict": options.max_tokens,
            }
        });
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Remote {
                status: status.as_u16(),
                detail: response.text().unwrap_or_default().trim().to_string(),
            });
        }
        let json: Value = response.json().map_err(|err| GenerateError::Remote {
            status: status.as_u16(),
            detail: format!("malformed response body: {err}"),
        })?;
        Ok(json
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    fn is_available(&self) -> bool {
        self.available_models().is_ok()
    }
}
