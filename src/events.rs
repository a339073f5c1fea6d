use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

use crate::workspace::Workspace;

/// Type of session events that can be logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStarted,
    IntentDetected,
    EditApplied,
    EditRejected,
    PublishCompleted,
    WatchTriggered,
}

/// General-purpose session event stored as JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}

impl SessionEvent {
    pub fn new(event_type: EventType, details: serde_json::Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            details,
        }
    }
}

/// Append-only JSONL log of session activity.
#[derive(Debug, Clone)]
pub struct SessionLog {
    events_path: PathBuf,
}

impl SessionLog {
    pub fn new(events_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
        }
    }

    pub fn for_workspace(workspace: &Workspace) -> Self {
        Self::new(workspace.events_path.clone())
    }

    pub fn append_event(&self, event: &SessionEvent) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)?;
        file.write_all(serde_json::to_string(event)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    pub fn load_events(&self) -> Result<Vec<SessionEvent>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.events_path)?;
        let mut events = Vec::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let event: SessionEvent = serde_json::from_str(line)?;
            events.push(event);
        }
        Ok(events)
    }
}

/// Appends a single event helper.
pub fn log_event(log: &SessionLog, event_type: EventType, details: serde_json::Value) -> Result<()> {
    log.append_event(&SessionEvent::new(event_type, details))
}
