use crate::portfolio::{ItemKind, ScalarField};

/// Classified purpose of a user utterance. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EditIntent {
    ShowSummary,
    UpdateField(ScalarField),
    UpdateEmail,
    AddItem(ItemKind),
    RemoveItem { kind: ItemKind, hint: String },
    GeneralQuery,
}

impl EditIntent {
    /// Stable label used in event details.
    pub fn label(&self) -> &'static str {
        match self {
            EditIntent::ShowSummary => "show_summary",
            EditIntent::UpdateField(ScalarField::Bio) => "update_bio",
            EditIntent::UpdateField(ScalarField::Headline) => "update_headline",
            EditIntent::UpdateField(ScalarField::Title) => "update_title",
            EditIntent::UpdateEmail => "update_email",
            EditIntent::AddItem(ItemKind::Projects) => "add_project",
            EditIntent::AddItem(ItemKind::Services) => "add_service",
            EditIntent::RemoveItem {
                kind: ItemKind::Projects,
                ..
            } => "remove_project",
            EditIntent::RemoveItem {
                kind: ItemKind::Services,
                ..
            } => "remove_service",
            EditIntent::GeneralQuery => "general_query",
        }
    }
}

const SHOW_WORDS: [&str; 4] = ["show", "display", "current", "view"];
const UPDATE_VERBS: [&str; 4] = ["update", "change", "set", "make"];

/// Maps an utterance to an intent.
///
/// Rules form a decision list checked top to bottom; the first match
/// wins. An utterance mentioning both "bio" and "project" therefore
/// resolves to whichever rule sits higher, and that ordering is part of
/// the observable contract.
pub fn classify(utterance: &str) -> EditIntent {
    let lower = utterance.to_ascii_lowercase();
    if SHOW_WORDS.iter().any(|word| lower.contains(word)) {
        return EditIntent::ShowSummary;
    }
    if lower.contains("bio") && has_update_verb(&lower) {
        return EditIntent::UpdateField(ScalarField::Bio);
    }
    if lower.contains("headline") && has_update_verb(&lower) {
        return EditIntent::UpdateField(ScalarField::Headline);
    }
    if lower.contains("title") && has_update_verb(&lower) {
        return EditIntent::UpdateField(ScalarField::Title);
    }
    if lower.contains("email") {
        return EditIntent::UpdateEmail;
    }
    if lower.contains("project") && lower.contains("add") {
        return EditIntent::AddItem(ItemKind::Projects);
    }
    if lower.contains("service") && lower.contains("add") {
        return EditIntent::AddItem(ItemKind::Services);
    }
    if lower.contains("project") && lower.contains("remove") {
        return EditIntent::RemoveItem {
            kind: ItemKind::Projects,
            hint: removal_hint(&lower, ItemKind::Projects),
        };
    }
    if lower.contains("service") && lower.contains("remove") {
        return EditIntent::RemoveItem {
            kind: ItemKind::Services,
            hint: removal_hint(&lower, ItemKind::Services),
        };
    }
    EditIntent::GeneralQuery
}

fn has_update_verb(lower: &str) -> bool {
    UPDATE_VERBS.iter().any(|verb| lower.contains(verb))
}

/// Pulls the removal target out of the lowered utterance: the text after
/// "remove ", minus an optional leading kind word, minus wrapping
/// quotes. May be empty when the utterance names no target.
fn removal_hint(lower: &str, kind: ItemKind) -> String {
    let marker = "remove ";
    let Some(pos) = lower.find(marker) else {
        return String::new();
    };
    let mut rest = &lower[pos + marker.len()..];
    let kind_prefix = format!("{} ", kind.singular());
    if let Some(stripped) = rest.strip_prefix(kind_prefix.as_str()) {
        rest = stripped;
    }
    let rest = rest.trim_start_matches(['\'', '"']);
    let end = rest.find(['\'', '"']).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}
