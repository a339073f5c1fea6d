//! Persist-then-sync pipeline for the portfolio document.
//!
//! Saving is ordered strictly before syncing, and a sync failure never
//! unwinds a completed save. The remote side is reached through the
//! `SyncBackend` seam so tests can count calls instead of shelling out.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

use crate::portfolio::{Portfolio, PortfolioStore};

/// Remote sync operations, in the order the publisher drives them.
pub trait SyncBackend {
    fn has_pending_changes(&self) -> Result<bool>;
    fn commit_all(&self, message: &str) -> Result<()>;
    fn push(&self) -> Result<()>;
}

/// What happened to one publish attempt. `saved` and `synced` move
/// independently: a local save can succeed while the remote leg fails.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub saved: bool,
    pub synced: bool,
    pub detail: String,
}

/// Sync backend that shells out to the git CLI in a fixed repository.
pub struct GitSync {
    repo_dir: PathBuf,
}

impl GitSync {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new("git")
            .current_dir(&self.repo_dir)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute 'git {}'. Is git installed?", args.join(" ")))
    }
}

impl SyncBackend for GitSync {
    fn has_pending_changes(&self) -> Result<bool> {
        let output = self.git(&["status", "--porcelain"])?;
        if !output.status.success() {
            bail!(
                "git status failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let add = self.git(&["add", "-A"])?;
        if !add.status.success() {
            bail!(
                "git add failed: {}",
                String::from_utf8_lossy(&add.stderr).trim()
            );
        }
        let commit = self.git(&["commit", "-m", message])?;
        if !commit.status.success() {
            bail!(
                "git commit failed: {}",
                String::from_utf8_lossy(&commit.stderr).trim()
            );
        }
        Ok(())
    }

    fn push(&self) -> Result<()> {
        let output = self.git(&["push"])?;
        if !output.status.success() {
            bail!(
                "git push failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// Saves the document through the store and drives the sync backend.
pub struct Publisher {
    store: PortfolioStore,
    sync: Box<dyn SyncBackend>,
    commit_message: String,
}

impl Publisher {
    pub fn new(store: PortfolioStore, sync: Box<dyn SyncBackend>, commit_message: String) -> Self {
        Self {
            store,
            sync,
            commit_message,
        }
    }

    /// Saves without touching the remote.
    pub fn save_only(&self, portfolio: &Portfolio) -> PublishResult {
        match self.store.save(portfolio) {
            Ok(outcome) => {
                debug!(path = %outcome.path.display(), hash = %outcome.hash, "portfolio saved");
                PublishResult {
                    saved: true,
                    synced: false,
                    detail: "sync skipped".to_string(),
                }
            }
            Err(err) => PublishResult {
                saved: false,
                synced: false,
                detail: format!("save failed: {err}"),
            },
        }
    }

    /// Saves, then syncs. The sync step is skipped entirely when the
    /// save fails, and a sync failure leaves the save in place.
    pub fn publish(&self, portfolio: &Portfolio) -> PublishResult {
        let mut result = self.save_only(portfolio);
        if !result.saved {
            return result;
        }
        match self.sync_saved() {
            Ok(detail) => {
                result.synced = true;
                result.detail = detail;
            }
            Err(err) => {
                result.synced = false;
                result.detail = format!("{err:#}");
            }
        }
        result
    }

    fn sync_saved(&self) -> Result<String> {
        if !self.sync.has_pending_changes()? {
            return Ok("no changes".to_string());
        }
        self.sync.commit_all(&self.commit_message)?;
        self.sync.push()?;
        Ok("pushed".to_string())
    }
}
