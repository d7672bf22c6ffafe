//! FosterFlow flag service entry point.

use clap::{Parser, Subcommand};
use fosterflow::cli;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// FosterFlow feature-flag server and CLI.
#[derive(Debug, Parser)]
#[command(name = "fosterflow", version, about)]
struct Cli {
    /// Path to the local flag database.
    #[arg(long, global = true, default_value = "fosterflow.redb")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the flag API server.
    Serve {
        /// Port to listen on (falls back to $PORT, then 8080).
        #[arg(long)]
        port: Option<u16>,

        /// Directory of static assets served on non-API routes.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// List all flags with their resolved values.
    List {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved value of one flag.
    Get {
        /// Flag id (e.g. ADVANCED_SEARCH).
        id: String,
    },

    /// Set one flag, optionally pushing the change to a server first.
    Set {
        /// Flag id (e.g. ADVANCED_SEARCH).
        id: String,

        /// New value: on/off.
        #[arg(value_parser = parse_on_off)]
        value: bool,

        /// Flag API base URL to push the change to.
        #[arg(long)]
        server: Option<String>,
    },

    /// Restore all flags to registry defaults.
    Reset,

    /// Fetch flags from a server and reconcile the local store.
    Sync {
        /// Flag API base URL.
        #[arg(long, default_value = "http://localhost:8080")]
        server: String,
    },

    /// Print the rollout identity token.
    Identity,
}

fn parse_on_off(s: &str) -> Result<bool, String> {
    match s {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(format!("expected on/off, got '{other}'")),
    }
}

async fn run(args: Cli) -> Result<(), cli::CliError> {
    match args.command {
        Command::Serve { port, static_dir } => cli::cmd_serve(port, static_dir).await,
        Command::List { json } => cli::cmd_list(&args.db, json),
        Command::Get { id } => cli::cmd_get(&args.db, &id).map(|_| ()),
        Command::Set { id, value, server } => {
            cli::cmd_set(&args.db, &id, value, server.as_deref()).await
        }
        Command::Reset => cli::cmd_reset(&args.db),
        Command::Sync { server } => cli::cmd_sync(&args.db, &server).await.map(|_| ()),
        Command::Identity => cli::cmd_identity(&args.db).map(|_| ()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
