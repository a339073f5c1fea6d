//! Poll loop that turns snapshot text into portfolio edits.
//!
//! The watcher owns a single fingerprint of the last snapshot it saw and
//! reacts only when that fingerprint changes, so the same snapshot is
//! never applied twice within one process lifetime.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::automation::tokens::parse_commands;
use crate::edit;
use crate::events::{log_event, EventType, SessionLog};
use crate::portfolio::{compute_hash, PortfolioStore};
use crate::publish::{PublishResult, Publisher};

/// Snapshots without this marker are discarded before any parsing.
const COMMAND_MARKER: &str = "[portfolio_";

/// Where the watcher reads snapshots from. `read_snapshot` takes `&mut
/// self` so sources may keep cursors or connections.
pub trait SnapshotSource {
    fn describe(&self) -> String;
    fn read_snapshot(&mut self) -> Result<String>;
}

/// Reads snapshots from a plain text file. A missing file reads as an
/// empty snapshot so the watcher can start before the source exists.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_snapshot(&mut self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read watch source {}", self.path.display()))
    }
}

/// What one triggered cycle did.
#[derive(Debug)]
pub struct WatchOutcome {
    pub applied: usize,
    pub publish: PublishResult,
}

/// Polls a snapshot source and applies any embedded command tokens to
/// the stored portfolio.
pub struct CommandWatcher {
    source: Box<dyn SnapshotSource>,
    store: PortfolioStore,
    publisher: Publisher,
    log: Option<SessionLog>,
    interval: Duration,
    last_fingerprint: Option<String>,
}

impl CommandWatcher {
    pub fn new(
        source: Box<dyn SnapshotSource>,
        store: PortfolioStore,
        publisher: Publisher,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            publisher,
            log: None,
            interval,
            last_fingerprint: None,
        }
    }

    pub fn set_event_log(&mut self, log: SessionLog) {
        self.log = Some(log);
    }

    /// Reads one snapshot and reacts if it changed since the last poll.
    /// Returns `None` for quiet cycles. The fingerprint is advanced
    /// before the portfolio is touched, so a document that fails to
    /// load is retried only when the snapshot changes again.
    pub fn poll_once(&mut self) -> Result<Option<WatchOutcome>> {
        let snapshot = self.source.read_snapshot()?;
        let fingerprint = compute_hash(snapshot.as_bytes());
        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return Ok(None);
        }
        self.last_fingerprint = Some(fingerprint);
        if !snapshot.to_ascii_lowercase().contains(COMMAND_MARKER) {
            return Ok(None);
        }
        let operations = parse_commands(&snapshot);
        if operations.is_empty() {
            return Ok(None);
        }
        info!(commands = operations.len(), "snapshot contains portfolio commands");
        let mut portfolio = self
            .store
            .load()
            .context("Cannot apply commands without a readable portfolio document")?;
        let mut applied = 0;
        for operation in &operations {
            let outcome = edit::apply(&mut portfolio, operation);
            debug!(
                operation = %operation.describe(),
                changed = outcome.changed,
                "command applied"
            );
            if outcome.changed {
                applied += 1;
            }
        }
        let publish = self.publisher.publish(&portfolio);
        if let Some(log) = &self.log {
            let details = json!({
                "commands": operations.len(),
                "applied": applied,
                "saved": publish.saved,
                "synced": publish.synced,
            });
            if let Err(err) = log_event(log, EventType::WatchTriggered, details) {
                warn!(error = %format!("{err:#}"), "failed to append watch event");
            }
        }
        Ok(Some(WatchOutcome { applied, publish }))
    }

    /// Runs the poll loop forever. Per-cycle failures are logged and the
    /// loop keeps going; only the caller can stop it.
    pub fn run(&mut self) -> Result<()> {
        info!(
            source = %self.source.describe(),
            interval_ms = self.interval.as_millis() as u64,
            "watching for portfolio commands"
        );
        loop {
            match self.poll_once() {
                Ok(Some(outcome)) => info!(
                    applied = outcome.applied,
                    saved = outcome.publish.saved,
                    synced = outcome.publish.synced,
                    detail = %outcome.publish.detail,
                    "watch cycle applied commands"
                ),
                Ok(None) => {}
                Err(err) => error!(error = %format!("{err:#}"), "watch cycle failed"),
            }
            thread::sleep(self.interval);
        }
    }
}
