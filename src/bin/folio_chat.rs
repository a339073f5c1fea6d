use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use foliobase::chat::{ChatSession, ConfirmEdit};
use foliobase::llm;
use foliobase::tools::ToolRegistry;
use foliobase::workspace::{ensure_workspace_structure, load_or_default};

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse()?;
    let config = load_or_default()?;
    let workspace = ensure_workspace_structure()?;

    println!("FolioBase chat");
    println!("Portfolio: {}", workspace.portfolio_path().display());

    let probe = llm::from_settings(&config.llm)?;
    if !probe.is_available() {
        println!(
            "Warning: the {} backend is not answering; edits will fail until it is up.",
            config.llm.provider
        );
    }

    let mut session = ChatSession::with_workspace(&config, &workspace)?;
    if config.chat.confirm_edits && !args.no_confirm {
        session.set_confirmer(Box::new(StdinConfirmer));
    }
    let tools = ToolRegistry::with_builtin_tools(&workspace.notes_dir);

    println!(
        "Type an instruction ('update my bio to ...'), 'show portfolio', 'push' to publish, or 'quit' to leave."
    );
    println!(
        "Tools: {} (run with 'tool <name> <input>')",
        tools.names().join(", ")
    );

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        match line.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "push" | "deploy" | "publish" => {
                match session.publish_now() {
                    Ok(reply) => println!("{reply}"),
                    Err(err) => {
                        // A halted session cannot save; there is nothing
                        // left to do interactively.
                        if session.is_halted() {
                            return Err(err);
                        }
                        eprintln!("Error: {err:#}");
                    }
                }
                continue;
            }
            "tools" => {
                for name in tools.names() {
                    if let Some(tool) = tools.get(&name) {
                        println!("{name}: {}", tool.describe());
                    }
                }
                continue;
            }
            _ => {}
        }
        if let Some(rest) = line.strip_prefix("tool ") {
            let (name, tool_input) = rest.split_once(' ').unwrap_or((rest, ""));
            match tools.execute(name, tool_input) {
                Ok(reply) => println!("{reply}"),
                Err(err) => eprintln!("Error: {err:#}"),
            }
            continue;
        }
        match session.handle_message(line) {
            Ok(reply) => println!("{reply}"),
            Err(err) => {
                if session.is_halted() {
                    return Err(err);
                }
                eprintln!("Error: {err:#}");
            }
        }
    }

    Ok(())
}

/// Prints the pending change and asks for a y/n answer on stdin.
struct StdinConfirmer;

impl ConfirmEdit for StdinConfirmer {
    fn confirm(&self, preview: &str) -> bool {
        println!("{preview}");
        let stdin = io::stdin();
        let mut answer = String::new();
        loop {
            print!("Apply this change? (y/n) ");
            if io::stdout().flush().is_err() {
                return false;
            }
            answer.clear();
            match stdin.lock().read_line(&mut answer) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => println!("Please answer y or n."),
            }
        }
    }
}

struct CliArgs {
    no_confirm: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut no_confirm = false;
        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--no-confirm" => no_confirm = true,
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
        Ok(Self { no_confirm })
    }
}

fn print_usage() {
    println!("FolioBase chat (portfolio editing assistant)");
    println!("Edits the portfolio document through natural-language instructions.");
    println!("Usage: cargo run --bin folio_chat -- [options]");
    println!("Options:");
    println!("  --no-confirm   Apply generated edits without asking first");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn,foliobase=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
