use foliobase::edit::{apply, EditOperation, DEFAULT_PROJECT_IMAGE};
use foliobase::portfolio::{ItemKind, Portfolio, ScalarField};

use super::sample_portfolio;

#[test]
fn scalar_overwrite_replaces_the_field() {
    let mut portfolio = sample_portfolio();
    let outcome = apply(
        &mut portfolio,
        &EditOperation::SetField {
            field: ScalarField::Headline,
            value: "Shipping small tools".to_string(),
        },
    );
    assert!(outcome.changed);
    assert_eq!(portfolio.headline, "Shipping small tools");
}

#[test]
fn set_email_touches_only_the_contact_block() {
    let mut portfolio = sample_portfolio();
    let bio_before = portfolio.bio.clone();
    let outcome = apply(
        &mut portfolio,
        &EditOperation::SetEmail {
            email: "new@avery.studio".to_string(),
        },
    );
    assert!(outcome.changed);
    assert_eq!(portfolio.contact.email, "new@avery.studio");
    assert_eq!(portfolio.bio, bio_before);
}

#[test]
fn added_project_gets_the_default_image() {
    let mut portfolio = Portfolio::default();
    apply(
        &mut portfolio,
        &EditOperation::AddItem {
            kind: ItemKind::Projects,
            title: "CLI Tool".to_string(),
            description: "A fast little utility".to_string(),
        },
    );
    assert_eq!(portfolio.projects.len(), 1);
    assert_eq!(portfolio.projects[0].image, DEFAULT_PROJECT_IMAGE);
}

#[test]
fn added_service_keeps_image_empty() {
    let mut portfolio = Portfolio::default();
    apply(
        &mut portfolio,
        &EditOperation::AddItem {
            kind: ItemKind::Services,
            title: "Consulting".to_string(),
            description: "Hourly product advice".to_string(),
        },
    );
    assert_eq!(portfolio.services.len(), 1);
    assert!(portfolio.services[0].image.is_empty());
}

#[test]
fn removal_matches_case_insensitive_substrings() {
    let mut portfolio = sample_portfolio();
    let outcome = apply(
        &mut portfolio,
        &EditOperation::RemoveItem {
            kind: ItemKind::Projects,
            hint: "ALPHA".to_string(),
        },
    );
    assert!(outcome.changed);
    assert_eq!(outcome.removed, 1);
    assert!(portfolio.projects.is_empty());
}

#[test]
fn removal_reports_how_many_items_matched() {
    let mut portfolio = sample_portfolio();
    portfolio.projects.push(foliobase::portfolio::PortfolioItem::new(
        "Alpha Dashboard",
        "Second alpha-stage tool",
    ));
    let outcome = apply(
        &mut portfolio,
        &EditOperation::RemoveItem {
            kind: ItemKind::Projects,
            hint: "alpha".to_string(),
        },
    );
    assert_eq!(outcome.removed, 2);
    assert!(portfolio.projects.is_empty());
}

#[test]
fn removal_without_a_match_changes_nothing() {
    let mut portfolio = sample_portfolio();
    let before = portfolio.clone();
    let outcome = apply(
        &mut portfolio,
        &EditOperation::RemoveItem {
            kind: ItemKind::Services,
            hint: "does-not-exist".to_string(),
        },
    );
    assert!(!outcome.changed);
    assert_eq!(outcome.removed, 0);
    assert_eq!(portfolio, before);
}

#[test]
fn removing_twice_is_idempotent() {
    let mut portfolio = sample_portfolio();
    let operation = EditOperation::RemoveItem {
        kind: ItemKind::Projects,
        hint: "tracker".to_string(),
    };
    let first = apply(&mut portfolio, &operation);
    assert!(first.changed);

    let after_first = portfolio.clone();
    let second = apply(&mut portfolio, &operation);
    assert!(!second.changed, "a repeated removal must be a no-op");
    assert_eq!(second.removed, 0);
    assert_eq!(portfolio, after_first);
}
