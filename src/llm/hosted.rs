use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use super::{transport_error, GenerateError, GenerateOptions, TextGenerator};
use crate::workspace::config::LlmSettings;

/// Backend for OpenAI-compatible hosted chat-completion endpoints.
///
/// Transient failures (HTTP 429, 5xx, network errors) are retried with
/// exponential backoff: 1s, 2s, 4s, ... capped at 32s. Other client
/// errors fail immediately.
pub struct HostedClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_retries: u32,
}

impl HostedClient {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = match std::env::var(&settings.api_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => bail!(
                "Hosted text backend requires the {} environment variable",
                settings.api_key_env
            ),
        };
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client for hosted backend")?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            max_retries: settings.max_retries,
        })
    }
}

impl TextGenerator for HostedClient {
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, GenerateError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                thread::sleep(delay);
            }

            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send();

            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let json: Value =
                            response.json().map_err(|err| GenerateError::Remote {
                                status: status.as_u16(),
                                detail: format!("malformed response body: {err}"),
                            })?;
                        return Ok(extract_completion(&json));
                    }
                    let detail = response.text().unwrap_or_default().trim().to_string();
                    let remote = GenerateError::Remote {
                        status: status.as_u16(),
                        detail,
                    };
                    // Rate limits and server errors are worth retrying.
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(remote);
                        continue;
                    }
                    return Err(remote);
                }
                Err(err) => {
                    last_err = Some(transport_error(err));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| GenerateError::Unavailable("no request attempted".to_string())))
    }
}

fn extract_completion(json: &Value) -> String {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .trim()
        .to_string()
}
