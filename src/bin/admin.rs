//! CLI administration tool for url-mapper.
//!
//! Validates redirect map files and inspects the remote store without going
//! through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Validate a map file against the prefixes in HOST_PREFIXES
//! cargo run --bin admin -- check ./url-map.txt
//!
//! # Validate against explicit prefixes
//! cargo run --bin admin -- check ./url-map.txt --prefix ua --prefix ru
//!
//! # Fetch and decode the value stored for a prefix and path
//! cargo run --bin admin -- fetch ua /some/path
//!
//! # Check Redis connectivity
//! cargo run --bin admin -- ping
//! ```
//!
//! # Environment Variables
//!
//! - `HOST_PREFIXES`: default prefix set for `check`
//! - `REDIS_URL` / `REDIS_HOST`: remote store for `fetch` and `ping`

use url_mapper::config::Config;
use url_mapper::domain::entities::{HostMap, resolution_key};
use url_mapper::domain::repositories::{RemoteError, RemoteStore};
use url_mapper::domain::static_table::{StaticTable, load_table_file};
use url_mapper::infrastructure::remote::RedisStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

/// CLI tool for managing url-mapper.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a redirect map file
    Check {
        /// Path to the map file
        file: PathBuf,

        /// Known site prefix (repeatable; defaults to prefixes from HOST_PREFIXES)
        #[arg(short, long = "prefix")]
        prefixes: Vec<String>,
    },

    /// Fetch the remote entry for a prefix and path
    Fetch {
        /// Site prefix (e.g., "ua")
        prefix: String,

        /// Request path (e.g., "/foo")
        path: String,
    },

    /// Check remote store connectivity
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file, prefixes } => handle_check(file, prefixes)?,
        Commands::Fetch { prefix, path } => handle_fetch(&prefix, &path).await?,
        Commands::Ping => handle_ping().await?,
    }

    Ok(())
}

/// Parses a map file and prints per-prefix entry counts.
fn handle_check(file: PathBuf, prefixes: Vec<String>) -> Result<()> {
    println!("{}", "🔍 Checking map file".bright_blue().bold());
    println!();

    let known = if prefixes.is_empty() {
        prefixes_from_env()?
    } else {
        prefixes.into_iter().collect()
    };

    println!("  File:     {}", file.display().to_string().cyan());
    println!(
        "  Prefixes: {}",
        known.iter().cloned().collect::<Vec<_>>().join(", ").cyan()
    );
    println!();

    let started = Instant::now();
    match load_table_file(&file, &known) {
        Ok(table) => {
            print_table_summary(&table);
            println!();
            println!(
                "{} ({} ms)",
                "✅ Map file is valid".green().bold(),
                started.elapsed().as_millis()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌ Invalid map file:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn print_table_summary(table: &StaticTable) {
    let mut prefixes: Vec<&str> = table.prefixes().collect();
    prefixes.sort_unstable();

    println!(
        "  {:<12} {}",
        "Prefix".bright_white().bold(),
        "Entries".bright_white().bold()
    );
    println!("  {}", "─".repeat(24).bright_black());
    for prefix in prefixes {
        println!("  {:<12} {}", prefix, table.prefix_len(prefix));
    }
    println!("  {}", "─".repeat(24).bright_black());
    println!("  {:<12} {}", "Total".bright_white(), table.len());
}

/// Fetches a key from Redis and prints the decoded entry.
async fn handle_fetch(prefix: &str, path: &str) -> Result<()> {
    let store = connect_store()?;
    let key = resolution_key(prefix, path);

    println!("{} {}", "🔑 Fetching".bright_blue().bold(), key.cyan());
    println!();

    let started = Instant::now();
    let result = store.fetch(&key).await;
    let elapsed_us = started.elapsed().as_micros();

    match result {
        Ok(entry) => {
            println!("  Code:   {}", entry.kind.code().bright_white().bold());
            println!("  Target: {}", entry.target.bright_yellow());
            println!("  Time:   {} µs", elapsed_us);
        }
        Err(RemoteError::NotFound) => {
            println!("{}", "  No value stored for this key".yellow());
        }
        Err(e) => {
            println!("{} {}", "❌".red(), e);
            std::process::exit(1);
        }
    }
    println!();

    Ok(())
}

/// Checks that Redis is reachable.
async fn handle_ping() -> Result<()> {
    let store = connect_store()?;

    println!("{}", "🔍 Checking Redis connection...".bright_blue());
    if store.health_check().await {
        println!("{}", "✅ Redis connection OK".green().bold());
        Ok(())
    } else {
        println!("{}", "❌ Redis is not reachable".red().bold());
        std::process::exit(1);
    }
}

fn connect_store() -> Result<RedisStore> {
    let config = Config::from_env().ok();
    let redis_url = config
        .as_ref()
        .and_then(|c| c.redis_url.clone())
        .or_else(|| std::env::var("REDIS_URL").ok())
        .context("REDIS_URL or REDIS_HOST must be set")?;
    let pool_config = config.map(|c| c.pool_config()).unwrap_or_default();

    RedisStore::new(&redis_url, pool_config).context("Failed to create Redis store")
}

fn prefixes_from_env() -> Result<BTreeSet<String>> {
    let spec = std::env::var("HOST_PREFIXES")
        .context("HOST_PREFIXES must be set when no --prefix is given")?;
    let suffix = std::env::var("HOST_PORT_SUFFIX").unwrap_or_default();
    let hosts = HostMap::parse(&spec, &suffix).context("Invalid HOST_PREFIXES")?;
    Ok(hosts.prefixes())
}
