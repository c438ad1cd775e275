//! scoutctl - command-line front end for the Scout research assistant.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scoutctl::{display, logging, repl};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scoutctl")]
#[command(about = "Scout - answers questions from ranked, cross-checked sources", long_about = None)]
#[command(version = scout_common::VERSION)]
struct Cli {
    /// Directory holding the persisted stores
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/scout/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// tracing filter, e.g. "debug" or "scout_common=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive conversation (default)
    Repl,

    /// Answer one question and exit
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show store counts and registered adapters
    Status,

    /// Prune old unknown queries and negative cache entries
    Maintenance {
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = scoutctl::load_config(cli.config.as_deref())?;
    let directive = logging::filter_directive(
        cli.log_level.as_deref(),
        std::env::var("RUST_LOG").ok(),
        &config.log.level,
    );
    logging::init_logging(&directive)?;

    let paths = scoutctl::data_paths(&config, cli.data_dir.as_deref());
    let mut engine = scoutctl::open_engine(config, paths)?;
    let color = io::stdout().is_terminal();
    let mut stdout = io::stdout();

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let stdin = io::stdin();
            repl::run_repl(stdin.lock(), &mut stdout, &mut engine)?;
        }
        Commands::Ask { text } => {
            let reply = engine.handle(&text.join(" ")).context("failed to answer")?;
            writeln!(stdout, "{}", reply.text)?;
        }
        Commands::Status => {
            write!(stdout, "{}", display::render_status(&engine.status(), color))?;
        }
        Commands::Maintenance { days } => {
            let report = engine.maintenance(days).context("maintenance failed")?;
            writeln!(stdout, "{}", display::render_maintenance(&report, days, color))?;
        }
    }
    Ok(())
}
