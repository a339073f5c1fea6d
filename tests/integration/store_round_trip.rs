use std::fs;

use anyhow::Result;
use foliobase::portfolio::{PortfolioStore, StoreError};
use tempfile::TempDir;

use super::sample_portfolio;

#[test]
fn save_then_load_round_trips() -> Result<()> {
    let dir = TempDir::new()?;
    let store = PortfolioStore::new(dir.path().join("portfolio.json"));
    let portfolio = sample_portfolio();

    let first = store.save(&portfolio)?;
    let loaded = store.load()?;
    assert_eq!(loaded, portfolio, "loaded document should match what was saved");

    let second = store.save(&loaded)?;
    assert_eq!(
        first.hash, second.hash,
        "re-saving a loaded document must be byte-stable"
    );
    Ok(())
}

#[test]
fn save_leaves_no_staging_file_behind() -> Result<()> {
    let dir = TempDir::new()?;
    let store = PortfolioStore::new(dir.path().join("portfolio.json"));
    store.save(&sample_portfolio())?;

    let leftovers: Vec<_> = fs::read_dir(dir.path())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "staging file should be renamed away");
    Ok(())
}

#[test]
fn missing_document_is_a_hard_error() -> Result<()> {
    let dir = TempDir::new()?;
    let store = PortfolioStore::new(dir.path().join("portfolio.json"));
    match store.load() {
        Err(StoreError::NotFound { path }) => {
            assert_eq!(path, store.path());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn corrupt_document_is_a_hard_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("portfolio.json");
    fs::write(&path, "{ not json at all")?;
    let store = PortfolioStore::new(&path);
    assert!(
        matches!(store.load(), Err(StoreError::Corrupt { .. })),
        "unparseable bytes must not load as an empty document"
    );
    Ok(())
}

#[test]
fn unknown_keys_and_missing_fields_are_tolerated() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("portfolio.json");
    fs::write(
        &path,
        r#"{ "name": "Jordan", "theme": "dark", "projects": [{ "title": "Solo" }] }"#,
    )?;
    let store = PortfolioStore::new(&path);
    let portfolio = store.load()?;
    assert_eq!(portfolio.name, "Jordan");
    assert_eq!(portfolio.projects.len(), 1);
    assert_eq!(portfolio.projects[0].title, "Solo");
    assert!(portfolio.bio.is_empty(), "absent fields default to empty");
    Ok(())
}
