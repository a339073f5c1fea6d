use serde_json::json;
use tracing::{debug, warn};

use crate::chat::classifier::{classify, EditIntent};
use crate::chat::extract::{extract, truncate_chars, ExtractedPayload, PayloadKind};
use crate::chat::prompts;
use crate::edit::{self, EditOperation};
use crate::events::{log_event, EventType, SessionLog};
use crate::llm::{GenerateError, GenerateOptions, TextGenerator};
use crate::portfolio::{ItemKind, Portfolio, ScalarField};

/// Outcome of one engine turn.
#[derive(Debug, Clone)]
pub struct EngineReply {
    pub changed: bool,
    pub message: String,
}

impl EngineReply {
    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            message: message.into(),
        }
    }

    fn applied(message: impl Into<String>) -> Self {
        Self {
            changed: true,
            message: message.into(),
        }
    }
}

/// Hook consulted before a generated payload reaches the mutator.
/// Interactive surfaces wire a prompt here; the default approves
/// everything, which keeps `handle` deterministic.
pub trait ConfirmEdit {
    fn confirm(&self, preview: &str) -> bool;
}

/// Approves every edit without asking.
pub struct AutoApprove;

impl ConfirmEdit for AutoApprove {
    fn confirm(&self, _preview: &str) -> bool {
        true
    }
}

/// Conversational edit pipeline: classify, generate, extract, validate,
/// confirm, mutate. Persisting the mutated document stays with the
/// caller; the engine itself performs no storage I/O.
pub struct EditEngine {
    generator: Box<dyn TextGenerator>,
    options: GenerateOptions,
    confirmer: Box<dyn ConfirmEdit>,
    log: Option<SessionLog>,
}

impl EditEngine {
    pub fn new(generator: Box<dyn TextGenerator>, options: GenerateOptions) -> Self {
        Self {
            generator,
            options,
            confirmer: Box::new(AutoApprove),
            log: None,
        }
    }

    pub fn set_confirmer(&mut self, confirmer: Box<dyn ConfirmEdit>) {
        self.confirmer = confirmer;
    }

    pub fn set_event_log(&mut self, log: SessionLog) {
        self.log = Some(log);
    }

    /// Handles one utterance against the document. Failures of the
    /// backend or the extractor come back as unchanged replies, never as
    /// errors; the document is untouched unless `changed` is true.
    pub fn handle(&self, portfolio: &mut Portfolio, utterance: &str) -> EngineReply {
        let intent = classify(utterance);
        self.record(
            EventType::IntentDetected,
            json!({
                "intent": intent.label(),
                "utterance_chars": utterance.chars().count(),
            }),
        );
        match intent {
            EditIntent::ShowSummary => EngineReply::unchanged(render_summary(portfolio)),
            EditIntent::UpdateField(field) => self.update_scalar(portfolio, field, utterance),
            EditIntent::UpdateEmail => self.update_email(portfolio, utterance),
            EditIntent::AddItem(kind) => self.add_item(portfolio, kind, utterance),
            EditIntent::RemoveItem { kind, hint } => self.remove_item(portfolio, kind, &hint),
            EditIntent::GeneralQuery => self.general_query(portfolio, utterance),
        }
    }

    fn update_scalar(
        &self,
        portfolio: &mut Portfolio,
        field: ScalarField,
        utterance: &str,
    ) -> EngineReply {
        let prompt = prompts::scalar_prompt(field, portfolio.scalar(field), utterance);
        let raw = match self.generator.generate(&prompt, &self.options) {
            Ok(raw) => raw,
            Err(err) => return self.backend_failed(err),
        };
        let Some(ExtractedPayload::Scalar(value)) = extract(&raw, PayloadKind::from(field)) else {
            return self.rejected(
                "no_payload",
                format!(
                    "I could not shape the generated text into a usable {}; nothing was changed.",
                    field.label()
                ),
            );
        };
        if !meets_threshold(field, &value) {
            return self.rejected(
                "too_short",
                format!(
                    "The generated {} was too short to use; nothing was changed.",
                    field.label()
                ),
            );
        }
        self.commit(portfolio, EditOperation::SetField { field, value })
    }

    fn update_email(&self, portfolio: &mut Portfolio, utterance: &str) -> EngineReply {
        // The address must be the user's literal input, never generated.
        let Some(email) = find_email(utterance) else {
            return self.rejected(
                "no_email",
                "I could not find an email address in your message; the contact email was left unchanged."
                    .to_string(),
            );
        };
        self.commit(portfolio, EditOperation::SetEmail { email })
    }

    fn add_item(&self, portfolio: &mut Portfolio, kind: ItemKind, utterance: &str) -> EngineReply {
        let prompt = prompts::item_prompt(kind, utterance);
        let raw = match self.generator.generate(&prompt, &self.options) {
            Ok(raw) => raw,
            Err(err) => return self.backend_failed(err),
        };
        let Some(ExtractedPayload::Item { title, description }) = extract(&raw, PayloadKind::Item)
        else {
            return self.rejected(
                "no_payload",
                format!(
                    "I could not extract {} details from the generated text; nothing was changed.",
                    kind.singular()
                ),
            );
        };
        if title.is_empty() {
            return self.rejected(
                "no_title",
                format!(
                    "The generated {} had no usable title; nothing was changed.",
                    kind.singular()
                ),
            );
        }
        self.commit(
            portfolio,
            EditOperation::AddItem {
                kind,
                title,
                description,
            },
        )
    }

    fn remove_item(&self, portfolio: &mut Portfolio, kind: ItemKind, hint: &str) -> EngineReply {
        if hint.is_empty() {
            return self.rejected(
                "no_hint",
                format!("Please tell me which {} to remove.", kind.singular()),
            );
        }
        self.commit(
            portfolio,
            EditOperation::RemoveItem {
                kind,
                hint: hint.to_string(),
            },
        )
    }

    fn general_query(&self, portfolio: &Portfolio, utterance: &str) -> EngineReply {
        let prompt = prompts::general_prompt(&render_summary(portfolio), utterance);
        match self.generator.generate(&prompt, &self.options) {
            Ok(reply) if !reply.is_empty() => EngineReply::unchanged(reply),
            Ok(_) => EngineReply::unchanged(
                "I have nothing useful to say to that; try asking about the portfolio or requesting an edit.",
            ),
            Err(err) => {
                warn!(error = %err, "generation failed");
                EngineReply::unchanged(match err {
                    GenerateError::Unavailable(_) => {
                        "The text backend is unreachable, so I cannot chat right now.".to_string()
                    }
                    GenerateError::Timeout => {
                        "The text backend timed out before replying.".to_string()
                    }
                    remote => format!("{remote}."),
                })
            }
        }
    }

    fn commit(&self, portfolio: &mut Portfolio, operation: EditOperation) -> EngineReply {
        if needs_confirmation(&operation) && !self.confirmer.confirm(&preview(&operation)) {
            return self.rejected("declined", "Okay, leaving it as it is.".to_string());
        }
        let outcome = edit::apply(portfolio, &operation);
        debug!(operation = %operation.describe(), changed = outcome.changed, "operation applied");
        if !outcome.changed {
            // Only removals can come back unchanged.
            let message = match &operation {
                EditOperation::RemoveItem { kind, hint } => {
                    format!("No {} matching '{}' found.", kind.singular(), hint)
                }
                _ => "Nothing needed changing.".to_string(),
            };
            return self.rejected("no_match", message);
        }
        self.record(
            EventType::EditApplied,
            json!({
                "operation": operation.describe(),
                "removed": outcome.removed,
            }),
        );
        EngineReply::applied(success_message(&operation, outcome.removed))
    }

    fn backend_failed(&self, err: GenerateError) -> EngineReply {
        warn!(error = %err, "generation failed");
        let (reason, message) = match &err {
            GenerateError::Unavailable(_) => (
                "backend_unavailable",
                "The text backend is unreachable; nothing was changed.".to_string(),
            ),
            GenerateError::Timeout => (
                "backend_timeout",
                "The text backend timed out; nothing was changed.".to_string(),
            ),
            GenerateError::Remote { .. } => ("backend_error", format!("{err}; nothing was changed.")),
        };
        self.rejected(reason, message)
    }

    fn rejected(&self, reason: &str, message: String) -> EngineReply {
        self.record(EventType::EditRejected, json!({ "reason": reason }));
        EngineReply::unchanged(message)
    }

    fn record(&self, event_type: EventType, details: serde_json::Value) {
        if let Some(log) = &self.log {
            if let Err(err) = log_event(log, event_type, details) {
                warn!(error = %format!("{err:#}"), "failed to append session event");
            }
        }
    }
}

/// Fixed-format document summary used by the show intent and as general
/// chat context.
pub fn render_summary(portfolio: &Portfolio) -> String {
    let mut out = String::from("Current portfolio:\n");
    out.push_str(&format!("  Name: {}\n", portfolio.name));
    out.push_str(&format!("  Title: {}\n", portfolio.title));
    out.push_str(&format!("  Headline: {}\n", portfolio.headline));
    out.push_str(&format!("  Bio: {}\n", shorten(&portfolio.bio, 100)));
    out.push_str(&format!("  Services ({}):\n", portfolio.services.len()));
    for (index, item) in portfolio.services.iter().enumerate() {
        out.push_str(&format!("    {}. {}\n", index + 1, item.title));
    }
    out.push_str(&format!("  Projects ({}):\n", portfolio.projects.len()));
    for (index, item) in portfolio.projects.iter().enumerate() {
        out.push_str(&format!("    {}. {}\n", index + 1, item.title));
    }
    out.push_str(&format!("  Email: {}", portfolio.contact.email));
    out
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", truncate_chars(text, max))
    }
}

/// Caller-enforced acceptance floors for generated scalars.
fn meets_threshold(field: ScalarField, value: &str) -> bool {
    let count = value.chars().count();
    match field {
        ScalarField::Bio => count > 20,
        ScalarField::Headline => count > 5,
        ScalarField::Title => count > 2,
    }
}

/// Only generated payloads warrant a confirmation stop; removals and
/// literal email updates apply directly.
fn needs_confirmation(operation: &EditOperation) -> bool {
    matches!(
        operation,
        EditOperation::SetField { .. } | EditOperation::AddItem { .. }
    )
}

fn preview(operation: &EditOperation) -> String {
    match operation {
        EditOperation::SetField { field, value } => format!("New {}:\n{}", field.label(), value),
        EditOperation::AddItem {
            kind,
            title,
            description,
        } => format!("New {}: {}\n{}", kind.singular(), title, description),
        other => other.describe(),
    }
}

fn success_message(operation: &EditOperation, removed: usize) -> String {
    match operation {
        EditOperation::SetField { field, value } => {
            format!("Updated {}.\n\n{}", field.label(), value)
        }
        EditOperation::SetEmail { email } => format!("Updated contact email to {email}."),
        EditOperation::AddItem { kind, title, .. } => {
            format!("Added {} '{}'.", kind.singular(), title)
        }
        EditOperation::RemoveItem { kind, hint } => {
            let noun = if removed == 1 {
                kind.singular()
            } else {
                kind.plural()
            };
            format!("Removed {removed} {noun} matching '{hint}'.")
        }
    }
}

/// Finds the first email-shaped token: word characters, dots, and
/// dashes around an '@', ending in a dotted alphanumeric tail.
fn find_email(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    for (at, &c) in chars.iter().enumerate() {
        if c != '@' {
            continue;
        }
        let mut start = at;
        while start > 0 && is_email_char(chars[start - 1]) {
            start -= 1;
        }
        if start == at {
            continue;
        }
        let mut end = at + 1;
        while end < chars.len() && is_email_char(chars[end]) {
            end += 1;
        }
        let domain = &chars[at + 1..end];
        // The token must end in ".tld": keep the last dot followed by
        // word characters and cut after that run.
        let mut dot = None;
        for (i, &dc) in domain.iter().enumerate() {
            if dc == '.' && i > 0 && domain.get(i + 1).is_some_and(|c| is_word_char(*c)) {
                dot = Some(i);
            }
        }
        let Some(dot) = dot else {
            continue;
        };
        let mut tail_end = dot + 1;
        while tail_end < domain.len() && is_word_char(domain[tail_end]) {
            tail_end += 1;
        }
        let local: String = chars[start..at].iter().collect();
        let host: String = domain[..tail_end].iter().collect();
        return Some(format!("{local}@{host}"));
    }
    None
}

fn is_email_char(c: char) -> bool {
    is_word_char(c) || c == '.' || c == '-'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
