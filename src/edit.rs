use crate::portfolio::{ItemKind, Portfolio, PortfolioItem, ScalarField};

/// Placeholder image assigned to projects created without one.
pub const DEFAULT_PROJECT_IMAGE: &str = "assets/project.svg";

/// A fully validated mutation of the portfolio document. By the time one
/// of these exists, [`apply`] cannot refuse it.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOperation {
    SetField { field: ScalarField, value: String },
    SetEmail { email: String },
    AddItem {
        kind: ItemKind,
        title: String,
        description: String,
    },
    RemoveItem { kind: ItemKind, hint: String },
}

impl EditOperation {
    /// Short human description used in confirmations, replies, and logs.
    pub fn describe(&self) -> String {
        match self {
            EditOperation::SetField { field, value } => {
                format!("set {} ({} chars)", field.label(), value.chars().count())
            }
            EditOperation::SetEmail { email } => format!("set email to {email}"),
            EditOperation::AddItem { kind, title, .. } => {
                format!("add {} '{}'", kind.singular(), title)
            }
            EditOperation::RemoveItem { kind, hint } => {
                format!("remove {} matching '{}'", kind.plural(), hint)
            }
        }
    }
}

/// Outcome of applying one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub changed: bool,
    /// Number of items removed; zero for non-removal operations.
    pub removed: usize,
}

/// Applies one operation to the document in place. Performs no I/O and
/// cannot fail; validation happens before an `EditOperation` exists.
pub fn apply(portfolio: &mut Portfolio, operation: &EditOperation) -> ApplyOutcome {
    match operation {
        EditOperation::SetField { field, value } => {
            *portfolio.scalar_mut(*field) = value.clone();
            ApplyOutcome {
                changed: true,
                removed: 0,
            }
        }
        EditOperation::SetEmail { email } => {
            portfolio.contact.email = email.clone();
            ApplyOutcome {
                changed: true,
                removed: 0,
            }
        }
        EditOperation::AddItem {
            kind,
            title,
            description,
        } => {
            let mut item = PortfolioItem::new(title.clone(), description.clone());
            if *kind == ItemKind::Projects {
                item.image = DEFAULT_PROJECT_IMAGE.to_string();
            }
            portfolio.items_mut(*kind).push(item);
            ApplyOutcome {
                changed: true,
                removed: 0,
            }
        }
        EditOperation::RemoveItem { kind, hint } => {
            let needle = hint.to_lowercase();
            let items = portfolio.items_mut(*kind);
            let before = items.len();
            items.retain(|item| !item.title.to_lowercase().contains(&needle));
            let removed = before - items.len();
            ApplyOutcome {
                changed: removed > 0,
                removed,
            }
        }
    }
}
