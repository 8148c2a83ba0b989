use std::path::PathBuf;

use clap::{Parser, Subcommand};
use threadmark_cli::cli::{resolve_config, run_detect_host, run_replay, run_watch};
use threadmark_cli::tracing_setup::init_tracing;

#[derive(Parser)]
#[command(name = "threadmark")]
#[command(about = "Reply counters for threads in a chat message list")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    /// Path to JSON engine config (defaults to <config dir>/threadmark/config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one pass per snapshot, in order, and print the counters
    Replay {
        /// Rendered page snapshots (HTML)
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
    },

    /// Follow a snapshot file rewritten as the page changes; stdin lines are navigations
    Watch {
        /// Rendered page snapshot (HTML)
        file: PathBuf,
        /// Watch even if the page is not the host application
        #[arg(long)]
        skip_host_check: bool,
    },

    /// Check whether a snapshot is the host application
    DetectHost {
        /// Rendered page snapshot (HTML)
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay { snapshots } => {
            let summary = run_replay(&snapshots, &config, std::io::stdout(), cli.pretty)?;
            let summary = serde_json::json!({ "event": "summary", "summary": summary });
            if cli.pretty {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", serde_json::to_string(&summary)?);
            }
        }
        Commands::Watch {
            file,
            skip_host_check,
        } => run_watch(&file, &config, cli.pretty, skip_host_check)?,
        Commands::DetectHost { file } => {
            if !run_detect_host(&file, &config)? {
                eprintln!("{} is not a {} page", file.display(), config.host_title);
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
