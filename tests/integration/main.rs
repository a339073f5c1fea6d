use std::env;

use foliobase::portfolio::{Portfolio, PortfolioItem};
use foliobase::workspace::{ensure_workspace_structure, HOME_ENV};
use tempfile::TempDir;

/// Portfolio document used as the starting point across the suite.
pub fn sample_portfolio() -> Portfolio {
    let mut portfolio = Portfolio::default();
    portfolio.name = "Jordan Avery".to_string();
    portfolio.title = "Product Designer".to_string();
    portfolio.headline = "Design systems that ship".to_string();
    portfolio.bio =
        "I design and build product interfaces, with a focus on small teams shipping fast."
            .to_string();
    portfolio.contact.email = "jordan@avery.studio".to_string();
    portfolio.services.push(PortfolioItem::new(
        "Brand Design",
        "Identity systems and usage guidelines",
    ));
    portfolio.projects.push(PortfolioItem::new(
        "Alpha Tracker",
        "Issue tracking dashboard for small teams",
    ));
    portfolio
}

mod intent_rules;
mod mutator_apply;
mod payload_extraction;
mod publish_flow;
mod store_round_trip;
mod tool_registry;

#[test]
fn workspace_honors_home_override() {
    let dir = TempDir::new().expect("failed to create temp workspace");
    env::set_var(HOME_ENV, dir.path());
    let workspace = ensure_workspace_structure().expect("workspace should build under override");
    assert!(workspace.root.starts_with(dir.path()));
    assert!(workspace.content_dir.is_dir());
    assert!(
        !workspace.portfolio_path().exists(),
        "the portfolio document must never be auto-created"
    );
}
