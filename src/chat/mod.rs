pub mod classifier;
pub mod engine;
pub mod extract;
pub mod prompts;

pub use classifier::{classify, EditIntent};
pub use engine::{render_summary, AutoApprove, ConfirmEdit, EditEngine, EngineReply};
pub use extract::{extract, ExtractedPayload, PayloadKind};

use anyhow::{bail, Context, Result};
use serde_json::json;
use tracing::warn;

use crate::events::{log_event, EventType, SessionLog};
use crate::llm;
use crate::portfolio::{Portfolio, PortfolioStore};
use crate::publish::{GitSync, Publisher};
use crate::workspace::{ensure_workspace_structure, AppConfig, Workspace};

/// Facade tying the edit engine to storage and publishing for one
/// interactive session. Construction fails when the portfolio document
/// is missing or unreadable; a session never starts on a default
/// document.
///
/// A failed save halts the session permanently: the in-memory document
/// can no longer be confirmed against disk, so further turns are
/// refused instead of piling mutations onto unconfirmed state.
pub struct ChatSession {
    portfolio: Portfolio,
    store: PortfolioStore,
    engine: EditEngine,
    publisher: Publisher,
    log: SessionLog,
    auto_sync: bool,
    fault: Option<String>,
}

impl ChatSession {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let workspace = ensure_workspace_structure()?;
        Self::with_workspace(config, &workspace)
    }

    pub fn with_workspace(config: &AppConfig, workspace: &Workspace) -> Result<Self> {
        let store = PortfolioStore::new(workspace.portfolio_path());
        let portfolio = store.load().with_context(|| {
            format!(
                "Cannot start a session without the portfolio document ({})",
                store.path().display()
            )
        })?;
        let generator = llm::from_settings(&config.llm)?;
        let log = SessionLog::for_workspace(workspace);
        let mut engine = EditEngine::new(generator, llm::GenerateOptions::from_settings(&config.llm));
        engine.set_event_log(log.clone());
        let repo_dir = config
            .publish
            .repo_dir
            .clone()
            .unwrap_or_else(|| workspace.content_dir.clone());
        let publisher = Publisher::new(
            store.clone(),
            Box::new(GitSync::new(repo_dir)),
            config.publish.commit_message.clone(),
        );
        let session = Self {
            portfolio,
            store,
            engine,
            publisher,
            log,
            auto_sync: config.publish.auto_sync,
            fault: None,
        };
        session.record(
            EventType::SessionStarted,
            json!({ "portfolio": session.store.path().display().to_string() }),
        );
        Ok(session)
    }

    pub fn set_confirmer(&mut self, confirmer: Box<dyn ConfirmEdit>) {
        self.engine.set_confirmer(confirmer);
    }

    /// Runs one utterance through the engine and persists any resulting
    /// change. A failed save after an accepted edit is an error and
    /// halts the session for good; a failed remote sync is only a
    /// warning appended to the reply.
    pub fn handle_message(&mut self, message: &str) -> Result<String> {
        self.refuse_if_halted()?;
        let reply = self.engine.handle(&mut self.portfolio, message);
        if !reply.changed {
            return Ok(reply.message);
        }
        let result = if self.auto_sync {
            self.publisher.publish(&self.portfolio)
        } else {
            self.publisher.save_only(&self.portfolio)
        };
        self.record(
            EventType::PublishCompleted,
            json!({
                "saved": result.saved,
                "synced": result.synced,
                "detail": result.detail,
            }),
        );
        if !result.saved {
            self.fault = Some(result.detail.clone());
            bail!("Portfolio save failed after an accepted edit: {}", result.detail);
        }
        let mut message = reply.message;
        if self.auto_sync && !result.synced {
            message.push_str(&format!(
                "\n\nWarning: remote sync failed ({}). The edit is saved locally; run 'push' to retry.",
                result.detail
            ));
        }
        Ok(message)
    }

    /// Saves and syncs on demand, regardless of the auto_sync setting.
    pub fn publish_now(&mut self) -> Result<String> {
        self.refuse_if_halted()?;
        let result = self.publisher.publish(&self.portfolio);
        self.record(
            EventType::PublishCompleted,
            json!({
                "saved": result.saved,
                "synced": result.synced,
                "detail": result.detail,
            }),
        );
        if !result.saved {
            self.fault = Some(result.detail.clone());
            bail!("Portfolio save failed: {}", result.detail);
        }
        if result.synced {
            Ok(format!("Published ({}).", result.detail))
        } else {
            Ok(format!(
                "Saved locally, but remote sync failed: {}",
                result.detail
            ))
        }
    }

    pub fn summary(&self) -> String {
        render_summary(&self.portfolio)
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// True once a save failure has halted the session. Surfaces should
    /// stop reading input and exit.
    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    fn refuse_if_halted(&self) -> Result<()> {
        if let Some(detail) = &self.fault {
            bail!(
                "The session is halted after a failed save ({detail}); start a new one once storage is healthy."
            );
        }
        Ok(())
    }

    fn record(&self, event_type: EventType, details: serde_json::Value) {
        if let Err(err) = log_event(&self.log, event_type, details) {
            warn!(error = %format!("{err:#}"), "failed to append session event");
        }
    }
}
