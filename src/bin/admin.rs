//! CLI administration tool for url-registry.
//!
//! Operates on the configured storage backend directly through the registry,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a destination
//! cargo run --bin admin -- create https://example.com/docs
//!
//! # Inspect a record, including its access count
//! cargo run --bin admin -- show aZ3k9Q
//!
//! # Point a code somewhere else
//! cargo run --bin admin -- update aZ3k9Q https://example.com/new
//!
//! # Delete a record (asks for confirmation unless --yes)
//! cargo run --bin admin -- delete aZ3k9Q
//!
//! # Check backend health
//! cargo run --bin admin -- check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORAGE_BACKEND`, `DATABASE_URL`/`DB_*`,
//! `REDIS_URL`/`REDIS_*`, `CODE_LENGTH`, `CODE_MAX_ATTEMPTS`,
//! `STORE_TIMEOUT_SECONDS`. With the default `memory` backend every
//! invocation starts from an empty store.

use url_registry::config::{self, StorageBackend};
use url_registry::domain::entities::Record;
use url_registry::prelude::RegistryService;
use url_registry::server::build_registry;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing url-registry records.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a destination under a new short code
    Create {
        /// Destination URL (`https://` is assumed when no scheme is given)
        url: String,
    },

    /// Show a record with its access count
    Show { code: String },

    /// Replace the destination of an existing code
    Update { code: String, url: String },

    /// Delete a record
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check storage backend health
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage_backend == StorageBackend::Memory {
        println!(
            "{}",
            "! STORAGE_BACKEND=memory: records will not outlive this command".yellow()
        );
    }

    let registry = build_registry(&config).await?;

    match cli.command {
        Commands::Create { url } => create_record(&registry, &url).await?,
        Commands::Show { code } => show_record(&registry, &code).await?,
        Commands::Update { code, url } => update_record(&registry, &code, &url).await?,
        Commands::Delete { code, yes } => delete_record(&registry, &code, yes).await?,
        Commands::Check => check_backend(&registry).await?,
    }

    Ok(())
}

async fn create_record(registry: &RegistryService, url: &str) -> Result<()> {
    let record = registry.create(url).await?;

    println!("{}", "Record created".green().bold());
    println!();
    print_record(&record);

    Ok(())
}

async fn show_record(registry: &RegistryService, code: &str) -> Result<()> {
    let record = registry.get(code).await?;
    print_record(&record);
    Ok(())
}

async fn update_record(registry: &RegistryService, code: &str, url: &str) -> Result<()> {
    let record = registry.update(code, url).await?;

    println!("{}", "Record updated".green().bold());
    println!();
    print_record(&record);

    Ok(())
}

/// Deletes a record after showing it and asking for confirmation.
///
/// Deleting a code that is not live is reported but is not an error.
async fn delete_record(registry: &RegistryService, code: &str, skip_confirm: bool) -> Result<()> {
    let record = match registry.get(code).await {
        Ok(record) => record,
        Err(e) if e.is_not_found() => {
            println!("{}", format!("Code {} is not live, nothing to do", code).yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_record(&record);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this record?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    registry.delete(code).await?;

    println!("{}", "Record deleted".green().bold());

    Ok(())
}

async fn check_backend(registry: &RegistryService) -> Result<()> {
    println!(
        "{}",
        format!("Checking {} backend...", registry.backend()).bright_blue()
    );

    if registry.health_check().await {
        println!("{}", "Storage backend OK".green().bold());
        Ok(())
    } else {
        anyhow::bail!("storage backend {} is not responding", registry.backend())
    }
}

fn print_record(record: &Record) {
    println!("  Code:     {}", record.code().cyan().bold());
    println!("  URL:      {}", record.destination().bright_white());
    println!(
        "  Created:  {}",
        record
            .created_at()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!(
        "  Updated:  {}",
        record
            .updated_at()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!(
        "  Accesses: {}",
        record.access_count().to_string().bright_green()
    );
}
