pub mod store;

pub use store::{compute_hash, PortfolioStore, SaveOutcome, StoreError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar fields the edit pipeline can overwrite as a unit.
///
/// `name` is part of the document but is only ever edited by hand, so it
/// has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Bio,
    Headline,
    Title,
}

impl ScalarField {
    pub fn label(&self) -> &'static str {
        match self {
            ScalarField::Bio => "bio",
            ScalarField::Headline => "headline",
            ScalarField::Title => "title",
        }
    }
}

/// Which item collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Services,
    Projects,
}

impl ItemKind {
    pub fn singular(&self) -> &'static str {
        match self {
            ItemKind::Services => "service",
            ItemKind::Projects => "project",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ItemKind::Services => "services",
            ItemKind::Projects => "projects",
        }
    }
}

/// Root portfolio document.
///
/// Every key defaults so a document missing fields still loads into a
/// valid tree. Collection order is insertion order and survives
/// load/mutate/save cycles.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Portfolio {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub services: Vec<PortfolioItem>,
    #[serde(default)]
    pub projects: Vec<PortfolioItem>,
}

impl Portfolio {
    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Bio => &self.bio,
            ScalarField::Headline => &self.headline,
            ScalarField::Title => &self.title,
        }
    }

    pub fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::Bio => &mut self.bio,
            ScalarField::Headline => &mut self.headline,
            ScalarField::Title => &mut self.title,
        }
    }

    pub fn items(&self, kind: ItemKind) -> &[PortfolioItem] {
        match kind {
            ItemKind::Services => &self.services,
            ItemKind::Projects => &self.projects,
        }
    }

    pub fn items_mut(&mut self, kind: ItemKind) -> &mut Vec<PortfolioItem> {
        match kind {
            ItemKind::Services => &mut self.services,
            ItemKind::Projects => &mut self.projects,
        }
    }
}

/// Contact block. Always present after deserialization, so setting the
/// email never has to create intermediate structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub social: BTreeMap<String, String>,
}

/// One entry in `services` or `projects`. Services leave `image` empty
/// and it is omitted from their serialized form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PortfolioItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
}

impl PortfolioItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: String::new(),
        }
    }
}
