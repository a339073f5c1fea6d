use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{bail, Result};
use foliobase::chat::ConfirmEdit;
use foliobase::llm::{GenerateError, GenerateOptions, TextGenerator};
use foliobase::publish::SyncBackend;

/// Generator that replays a fixed script of replies. Once the script is
/// exhausted, further calls report the backend as unreachable.
pub struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<String, GenerateError>>>,
    calls: Rc<Cell<usize>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, GenerateError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_reply(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn call_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, _prompt: &str, _options: &GenerateOptions) -> Result<String, GenerateError> {
        self.calls.set(self.calls.get() + 1);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(GenerateError::Unavailable("script exhausted".to_string())))
    }
}

/// Confirmation hook that turns every edit down.
pub struct DeclineAll;

impl ConfirmEdit for DeclineAll {
    fn confirm(&self, _preview: &str) -> bool {
        false
    }
}

/// Call counters shared between a `RecordingSync` and the test that owns
/// it, since the publisher takes the backend by value.
#[derive(Default)]
pub struct SyncCalls {
    pub status: Cell<usize>,
    pub commits: Cell<usize>,
    pub pushes: Cell<usize>,
}

/// Sync backend that records calls instead of shelling out to git.
pub struct RecordingSync {
    pub pending: bool,
    pub fail_push: bool,
    calls: Rc<SyncCalls>,
}

impl RecordingSync {
    pub fn new(pending: bool) -> (Self, Rc<SyncCalls>) {
        let calls = Rc::new(SyncCalls::default());
        let sync = Self {
            pending,
            fail_push: false,
            calls: Rc::clone(&calls),
        };
        (sync, calls)
    }
}

impl SyncBackend for RecordingSync {
    fn has_pending_changes(&self) -> Result<bool> {
        self.calls.status.set(self.calls.status.get() + 1);
        Ok(self.pending)
    }

    fn commit_all(&self, _message: &str) -> Result<()> {
        self.calls.commits.set(self.calls.commits.get() + 1);
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.calls.pushes.set(self.calls.pushes.get() + 1);
        if self.fail_push {
            bail!("remote rejected the push");
        }
        Ok(())
    }
}
