pub mod tokens;
pub mod watcher;

pub use tokens::parse_commands;
pub use watcher::{CommandWatcher, FileSource, SnapshotSource, WatchOutcome};
