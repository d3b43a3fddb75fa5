//! Honor Culture CLI - Data file and admin management tools.
//!
//! # Usage
//!
//! ```bash
//! # Write the seed document (refuses to overwrite without --force)
//! hc-cli store init
//!
//! # Parse the document and report collection sizes
//! hc-cli store check
//!
//! # Hash a password for an admin entry
//! hc-cli admin hash-password 's3cret'
//!
//! # Show the 20 most recent audit entries
//! hc-cli audit tail --limit 20
//! ```
//!
//! # Commands
//!
//! - `store` - Initialise or check the JSON document
//! - `admin` - Admin account helpers
//! - `audit` - Read the audit log
//!
//! The document path comes from `--data-file`, then `HONOR_DATA_FILE`, then
//! `data.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Default document path when neither flag nor environment names one.
const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Parser)]
#[command(name = "hc-cli")]
#[command(author, version, about = "Honor Culture CLI tools")]
struct Cli {
    /// Path of the JSON document
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the JSON document
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Admin account helpers
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Read the audit log
    Audit {
        #[command(subcommand)]
        action: AuditAction,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Write the seed document
    Init {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },
    /// Parse the document and report its contents
    Check,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Print an Argon2id hash for a password
    HashPassword {
        /// Password to hash
        password: String,
    },
}

#[derive(Subcommand)]
enum AuditAction {
    /// Show the most recent entries, newest first
    Tail {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_file = resolve_data_file(cli.data_file);

    match cli.command {
        Commands::Store { action } => match action {
            StoreAction::Init { force } => commands::store::init(&data_file, force).await?,
            StoreAction::Check => commands::store::check(&data_file).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::HashPassword { password } => {
                commands::admin::hash_password(password.into())?;
            }
        },
        Commands::Audit { action } => match action {
            AuditAction::Tail { limit } => commands::audit::tail(&data_file, limit).await?,
        },
    }
    Ok(())
}

fn resolve_data_file(flag: Option<PathBuf>) -> PathBuf {
    dotenvy::dotenv().ok();

    flag.or_else(|| {
        std::env::var("HONOR_DATA_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}
