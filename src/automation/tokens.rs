//! Parser for bracketed command tokens embedded in free text.
//!
//! Automation surfaces emit tokens such as
//! `[PORTFOLIO_EDIT: bio | A short bio]`,
//! `[PORTFOLIO_ADD: project | Title | Description]` and
//! `[PORTFOLIO_REMOVE: service | Name]`. Each slot (tag plus keyword) is
//! searched independently; the first well-formed occurrence wins and
//! malformed candidates are skipped without aborting the scan.

use crate::edit::EditOperation;
use crate::portfolio::{ItemKind, ScalarField};

/// Extracts every recognized command from `text`, in a fixed slot
/// order: bio, headline, title, email, add project, add service,
/// remove project, remove service.
pub fn parse_commands(text: &str) -> Vec<EditOperation> {
    let mut operations = Vec::new();
    for field in [ScalarField::Bio, ScalarField::Headline, ScalarField::Title] {
        if let Some(parts) = first_token(text, "PORTFOLIO_EDIT", field.label(), 1) {
            operations.push(EditOperation::SetField {
                field,
                value: parts[0].clone(),
            });
        }
    }
    if let Some(parts) = first_token(text, "PORTFOLIO_EDIT", "email", 1) {
        operations.push(EditOperation::SetEmail {
            email: parts[0].clone(),
        });
    }
    for kind in [ItemKind::Projects, ItemKind::Services] {
        if let Some(parts) = first_token(text, "PORTFOLIO_ADD", kind.singular(), 2) {
            operations.push(EditOperation::AddItem {
                kind,
                title: parts[0].clone(),
                description: parts[1].clone(),
            });
        }
    }
    for kind in [ItemKind::Projects, ItemKind::Services] {
        if let Some(parts) = first_token(text, "PORTFOLIO_REMOVE", kind.singular(), 1) {
            operations.push(EditOperation::RemoveItem {
                kind,
                hint: parts[0].clone(),
            });
        }
    }
    operations
}

/// Finds the first well-formed `[TAG: keyword | part...]` token and
/// returns its trimmed payload parts. The match is case-insensitive and
/// the payload may span newlines. The final part absorbs any extra `|`
/// characters, so descriptions can contain pipes. A candidate with the
/// wrong part count or an empty first part is malformed; the scan moves
/// on to the next occurrence instead of giving up on the slot.
fn first_token(text: &str, tag: &str, keyword: &str, parts: usize) -> Option<Vec<String>> {
    // ASCII lowering keeps byte offsets aligned with the original text.
    let lower = text.to_ascii_lowercase();
    let opener = format!("[{}:", tag.to_ascii_lowercase());
    let mut from = 0;
    while let Some(offset) = lower[from..].find(&opener) {
        let body_start = from + offset + opener.len();
        let Some(close) = lower[body_start..].find(']') else {
            return None;
        };
        let body = &text[body_start..body_start + close];
        from = body_start;
        let mut fields = body.splitn(parts + 1, '|');
        let head = fields.next().unwrap_or_default().trim();
        if !head.eq_ignore_ascii_case(keyword) {
            continue;
        }
        let payload: Vec<String> = fields.map(|part| part.trim().to_string()).collect();
        if payload.len() != parts || payload[0].is_empty() {
            continue;
        }
        return Some(payload);
    }
    None
}
