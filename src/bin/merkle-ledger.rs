#![forbid(unsafe_code)]
//! Interactive shell: queue transactions, seal them into blocks, inspect the chain.

use clap::Parser;
use colored::*;
use merkle_ledger::cli::{help_text, render_reply};
use merkle_ledger::config::{load_config, DEFAULT_CONFIG_FILE};
use merkle_ledger::session::{Command, Reply, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides logging.level from the configuration
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level()?)
        .with_writer(io::stderr)
        .init();
    tracing::info!("Starting ledger shell (config = {})", cli.config.display());

    if config.cli.show_help {
        println!("{}", help_text().bright_cyan());
    }

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("\n{}", config.cli.prompt.bright_white());
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        };

        match session.execute(command) {
            Ok(reply) => {
                let text = render_reply(&reply);
                match reply {
                    Reply::TransactionAdded { .. } | Reply::BlockAdded(_) | Reply::Verified { .. } => {
                        println!("{}", text.bright_green())
                    }
                    Reply::NoPendingTransactions | Reply::Unknown(_) => println!("{}", text.yellow()),
                    Reply::Exit => {
                        println!("{}", text);
                        break;
                    }
                    _ => println!("{}", text),
                }
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }

    Ok(())
}
