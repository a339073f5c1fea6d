pub mod config;

pub use config::{config_file_path, load_or_default, save, AppConfig};

use anyhow::{Context, Result};
use directories::BaseDirs;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the workspace root location.
pub const HOME_ENV: &str = "FOLIOBASE_HOME";

/// File name of the portfolio document inside the content directory.
pub const PORTFOLIO_FILE_NAME: &str = "portfolio.json";

/// Returns the root directory where FolioBase stores data.
///
/// Order of precedence:
/// 1. `FOLIOBASE_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("FolioBase"))
}

/// Convenience struct exposing important workspace paths.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    /// Directory holding the portfolio document (and, when publishing is
    /// configured, the git work tree).
    pub content_dir: PathBuf,
    pub notes_dir: PathBuf,
    pub watch_dir: PathBuf,
    pub events_path: PathBuf,
}

impl Workspace {
    pub fn portfolio_path(&self) -> PathBuf {
        self.content_dir.join(PORTFOLIO_FILE_NAME)
    }

    /// Default text file polled by the watcher daemon.
    pub fn default_watch_source(&self) -> PathBuf {
        self.watch_dir.join("commands.txt")
    }
}

/// Ensures the workspace directories exist. The portfolio document
/// itself is never auto-created; a session against a missing document
/// fails loudly instead.
pub fn ensure_workspace_structure() -> Result<Workspace> {
    let root = workspace_root()?;
    let content_dir = root.join("content");
    let notes_dir = root.join("notes");
    let watch_dir = root.join("watch");
    fs::create_dir_all(&content_dir)?;
    fs::create_dir_all(&notes_dir)?;
    fs::create_dir_all(&watch_dir)?;
    Ok(Workspace {
        events_path: root.join("events.jsonl"),
        root,
        content_dir,
        notes_dir,
        watch_dir,
    })
}
