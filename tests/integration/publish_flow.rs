use std::fs;

use anyhow::Result;
use foliobase::portfolio::PortfolioStore;
use foliobase::publish::Publisher;
use tempfile::TempDir;

use super::sample_portfolio;
use super::support::fakes::RecordingSync;

#[test]
fn publish_with_no_remote_changes_skips_commit_and_push() -> Result<()> {
    let dir = TempDir::new()?;
    let store = PortfolioStore::new(dir.path().join("portfolio.json"));
    let (sync, calls) = RecordingSync::new(false);
    let publisher = Publisher::new(store, Box::new(sync), "Update portfolio content".to_string());

    let result = publisher.publish(&sample_portfolio());
    assert!(result.saved);
    assert!(result.synced, "a clean tree still counts as synced");
    assert_eq!(result.detail, "no changes");
    assert_eq!(calls.status.get(), 1);
    assert_eq!(calls.commits.get(), 0, "no commit without pending changes");
    assert_eq!(calls.pushes.get(), 0, "no push without pending changes");
    Ok(())
}

#[test]
fn publish_with_pending_changes_commits_then_pushes() -> Result<()> {
    let dir = TempDir::new()?;
    let store = PortfolioStore::new(dir.path().join("portfolio.json"));
    let (sync, calls) = RecordingSync::new(true);
    let publisher = Publisher::new(store, Box::new(sync), "Update portfolio content".to_string());

    let result = publisher.publish(&sample_portfolio());
    assert!(result.saved);
    assert!(result.synced);
    assert_eq!(result.detail, "pushed");
    assert_eq!(calls.commits.get(), 1);
    assert_eq!(calls.pushes.get(), 1);
    Ok(())
}

#[test]
fn a_failed_push_never_unwinds_the_save() -> Result<()> {
    let dir = TempDir::new()?;
    let store = PortfolioStore::new(dir.path().join("portfolio.json"));
    let (mut sync, calls) = RecordingSync::new(true);
    sync.fail_push = true;
    let publisher = Publisher::new(
        store.clone(),
        Box::new(sync),
        "Update portfolio content".to_string(),
    );

    let portfolio = sample_portfolio();
    let result = publisher.publish(&portfolio);
    assert!(result.saved);
    assert!(!result.synced);
    assert!(result.detail.contains("remote rejected"));
    assert_eq!(calls.pushes.get(), 1);
    assert_eq!(
        store.load()?,
        portfolio,
        "the saved document must survive a sync failure"
    );
    Ok(())
}

#[test]
fn a_failed_save_never_reaches_the_remote() -> Result<()> {
    let dir = TempDir::new()?;
    // A directory where the document should be makes the save fail.
    let path = dir.path().join("portfolio.json");
    fs::create_dir_all(&path)?;
    let store = PortfolioStore::new(&path);
    let (sync, calls) = RecordingSync::new(true);
    let publisher = Publisher::new(store, Box::new(sync), "Update portfolio content".to_string());

    let result = publisher.publish(&sample_portfolio());
    assert!(!result.saved);
    assert!(!result.synced);
    assert!(result.detail.contains("save failed"));
    assert_eq!(calls.status.get(), 0, "sync must not run after a failed save");
    Ok(())
}

#[test]
fn save_only_never_touches_the_sync_backend() -> Result<()> {
    let dir = TempDir::new()?;
    let store = PortfolioStore::new(dir.path().join("portfolio.json"));
    let (sync, calls) = RecordingSync::new(true);
    let publisher = Publisher::new(store, Box::new(sync), "Update portfolio content".to_string());

    let result = publisher.save_only(&sample_portfolio());
    assert!(result.saved);
    assert!(!result.synced);
    assert_eq!(result.detail, "sync skipped");
    assert_eq!(calls.status.get(), 0);
    Ok(())
}
