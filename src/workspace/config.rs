//! Configuration primitives for FolioBase.
//!
//! Stored in a machine-readable TOML file located at
//! `<workspace root>/config/config.toml`. The config selects the
//! text-generation backend and tunes publish and watcher behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Text-generation backend selection and tuning.
    #[serde(default)]
    pub llm: LlmSettings,
    /// Conversational surface behavior.
    #[serde(default)]
    pub chat: ChatSettings,
    /// Save/sync behavior after accepted edits.
    #[serde(default)]
    pub publish: PublishSettings,
    /// Command-token watcher tuning.
    #[serde(default)]
    pub watch: WatchSettings,
}

/// Which backend answers `generate` calls and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// `"ollama"` (local server) or `"hosted"` (chat-completions API).
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the local Ollama server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chat-completions endpoint used by the hosted backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the hosted backend's API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Ceiling for one interactive generation call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries allowed for transient hosted-backend failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    500
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_max_retries() -> u32 {
    2
}

/// Conversational surface preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Ask before applying generated edits to the document.
    #[serde(default = "default_confirm_edits")]
    pub confirm_edits: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            confirm_edits: default_confirm_edits(),
        }
    }
}

const fn default_confirm_edits() -> bool {
    true
}

/// Save/sync behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSettings {
    /// Sync to the git remote after every accepted edit. When off, edits
    /// are still saved locally and `push` syncs on demand.
    #[serde(default = "default_auto_sync")]
    pub auto_sync: bool,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
    /// Git work tree; defaults to the workspace content directory.
    #[serde(default)]
    pub repo_dir: Option<PathBuf>,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            auto_sync: default_auto_sync(),
            commit_message: default_commit_message(),
            repo_dir: None,
        }
    }
}

const fn default_auto_sync() -> bool {
    true
}

fn default_commit_message() -> String {
    "Update portfolio content".to_string()
}

/// Command-token watcher tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Text file polled for command tokens; defaults to
    /// `<workspace root>/watch/commands.txt`.
    #[serde(default)]
    pub source_path: Option<PathBuf>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            source_path: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

const fn default_poll_interval_ms() -> u64 {
    500
}

/// Standard relative path to the config file (under the workspace root).
pub const CONFIG_FILE_NAME: &str = "config.toml";

use anyhow::{Context, Result};
use std::fs;

use super::workspace_root;

/// Returns the config directory under the workspace root.
pub fn config_dir() -> Result<PathBuf> {
    let root = workspace_root()?;
    Ok(root.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}
