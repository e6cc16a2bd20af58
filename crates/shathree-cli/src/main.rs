//! # shathree CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shathree_cli::catalog::{run_catalog, CatalogArgs};
use shathree_cli::hash::{run_hash, HashArgs};
use shathree_cli::query::{run_query, QueryArgs};

/// SHA3 hashing for values, files and query results.
///
/// Computes SHA3-224/256/384/512 digests of raw input, and digests of the
/// canonical encoding of query results served from a catalog.
#[derive(Parser, Debug)]
#[command(name = "shathree", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// SHA3 digest of files, a string, or stdin.
    Hash(HashArgs),

    /// SHA3 digest of the results of SQL statements run against a catalog.
    Query(QueryArgs),

    /// Validate a catalog or list the digest of each of its statements.
    Catalog(CatalogArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("shathree CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Hash(args) => run_hash(&args),
        Commands::Query(args) => run_query(&args),
        Commands::Catalog(args) => run_catalog(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
