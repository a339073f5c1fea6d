use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use foliobase::automation::{CommandWatcher, FileSource};
use foliobase::events::SessionLog;
use foliobase::portfolio::PortfolioStore;
use foliobase::publish::{GitSync, Publisher};
use foliobase::workspace::{ensure_workspace_structure, load_or_default};

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse()?;
    let config = load_or_default()?;
    let workspace = ensure_workspace_structure()?;

    let store = PortfolioStore::new(workspace.portfolio_path());
    store.load().with_context(|| {
        format!(
            "Cannot watch without the portfolio document ({})",
            store.path().display()
        )
    })?;

    let source_path = args
        .source
        .or_else(|| config.watch.source_path.clone())
        .unwrap_or_else(|| workspace.default_watch_source());
    let interval_ms = args.interval_ms.unwrap_or(config.watch.poll_interval_ms);
    let repo_dir = config
        .publish
        .repo_dir
        .clone()
        .unwrap_or_else(|| workspace.content_dir.clone());

    let publisher = Publisher::new(
        store.clone(),
        Box::new(GitSync::new(repo_dir)),
        config.publish.commit_message.clone(),
    );
    let mut watcher = CommandWatcher::new(
        Box::new(FileSource::new(&source_path)),
        store,
        publisher,
        Duration::from_millis(interval_ms),
    );
    watcher.set_event_log(SessionLog::for_workspace(&workspace));

    println!("FolioBase watcher");
    println!("Watching {} every {}ms.", source_path.display(), interval_ms);
    println!("Drop [PORTFOLIO_EDIT: ...] style commands into the file to apply them.");
    watcher.run()
}

struct CliArgs {
    source: Option<PathBuf>,
    interval_ms: Option<u64>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut source = None;
        let mut interval_ms = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--source" => {
                    let value = args.next().context("Expected a path after --source")?;
                    source = Some(PathBuf::from(value));
                }
                "--interval-ms" => {
                    let value = args
                        .next()
                        .context("Expected a number after --interval-ms")?;
                    interval_ms = Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid interval '{value}'"))?,
                    );
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(Self {
            source,
            interval_ms,
        })
    }
}

fn print_usage() {
    println!("FolioBase watcher (command file daemon)");
    println!("Polls a text file for portfolio command tokens and applies them.");
    println!("Usage: cargo run --bin folio_watch -- [options]");
    println!("Options:");
    println!("  --source <path>      File to poll (default: <workspace>/watch/commands.txt)");
    println!("  --interval-ms <n>    Poll interval in milliseconds (default: 500)");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn,foliobase=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
