//! # Catalog Subcommand
//!
//! Catalog files describe canned statements and their result rows for the
//! in-memory query engine. The format is chosen by file extension: `.json`
//! for JSON, `.yaml` or `.yml` for YAML.
//!
//! ```yaml
//! statements:
//!   - sql: SELECT id, name FROM users ORDER BY id
//!     columns: [id, name]
//!     rows:
//!       - [1, alice]
//!       - [2, ~]
//!   - sql: DELETE FROM users
//!     read_only: false
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use shathree_core::DigestSize;
use shathree_query::{hash_query, Catalog, MemoryEngine};

use crate::parse_size;

/// Arguments for the `shathree catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Load a catalog and report whether it is well formed.
    Check {
        /// Path to the catalog file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the result digest of every read-only statement in a catalog.
    Digests {
        /// Path to the catalog file.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Digest size in bits: 224, 256, 384 or 512.
        #[arg(long, short = 's', value_parser = parse_size, default_value = "256")]
        size: DigestSize,
    },
}

/// Execute the catalog subcommand.
pub fn run_catalog(args: &CatalogArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    catalog_to(args, &mut stdout.lock())
}

/// Execute the catalog subcommand with an explicit output stream.
pub fn catalog_to<W: Write>(args: &CatalogArgs, out: &mut W) -> Result<u8> {
    match &args.command {
        CatalogCommand::Check { file } => cmd_check(file, out),
        CatalogCommand::Digests { file, size } => cmd_digests(file, *size, out),
    }
}

fn cmd_check<W: Write>(file: &Path, out: &mut W) -> Result<u8> {
    let engine = load_engine(file)?;
    writeln!(
        out,
        "OK: {} ({} statements)",
        file.display(),
        engine.len()
    )?;
    Ok(0)
}

fn cmd_digests<W: Write>(file: &Path, size: DigestSize, out: &mut W) -> Result<u8> {
    let engine = load_engine(file)?;
    for entry in engine.catalog().statements {
        if !entry.read_only {
            continue;
        }
        let digest = hash_query(&engine, Some(&entry.sql), Some(i64::from(size.bits())))
            .with_context(|| format!("failed to hash [{}]", entry.sql))?
            .context("no digest produced")?;
        writeln!(out, "{}  {}", digest.to_hex(), entry.sql)?;
    }
    Ok(0)
}

/// Read and parse a catalog file.
///
/// # Errors
///
/// Fails if the file cannot be read, has an unsupported extension, or does
/// not parse.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let catalog = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON catalog {}", path.display()))?,
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML catalog {}", path.display()))?,
        _ => bail!(
            "unsupported catalog format: {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    };
    Ok(catalog)
}

/// Read a catalog file and build an engine from it.
///
/// # Errors
///
/// Fails as [`load_catalog`] does, or if an entry is invalid.
pub fn load_engine(path: &Path) -> Result<MemoryEngine> {
    let catalog = load_catalog(path)?;
    let engine = MemoryEngine::from_catalog(catalog)
        .with_context(|| format!("invalid catalog {}", path.display()))?;
    tracing::debug!(path = %path.display(), statements = engine.len(), "catalog loaded");
    Ok(engine)
}
