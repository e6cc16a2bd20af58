//! # Query Subcommand
//!
//! Hashes the results of one or more SQL statements run against a catalog.
//!
//! ```bash
//! shathree query --catalog fixtures.yaml "SELECT 1; SELECT id FROM users"
//! echo "SELECT 1" | shathree query --catalog fixtures.yaml --size 512
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use shathree_core::DigestSize;
use shathree_query::{canonical_stream, hash_query};

use crate::catalog::load_engine;
use crate::{matches_expected, parse_size};

/// Arguments for the `shathree query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Catalog file (.json, .yaml or .yml) serving the statements.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub catalog: PathBuf,

    /// Digest size in bits: 224, 256, 384 or 512.
    #[arg(long, short = 's', value_parser = parse_size, default_value = "256")]
    pub size: DigestSize,

    /// Expected digest (hex or `sha3-<bits>:<hex>`). Exit 1 on mismatch.
    #[arg(long, value_name = "DIGEST")]
    pub expect: Option<String>,

    /// Print the canonical record stream to stdout instead of its digest.
    #[arg(long, conflicts_with = "expect")]
    pub stream: bool,

    /// SQL text, possibly several statements. Read from stdin when omitted.
    #[arg(value_name = "SQL")]
    pub sql: Option<String>,
}

/// Execute the query subcommand against the process's stdin and stdout.
pub fn run_query(args: &QueryArgs) -> Result<u8> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    query_to(args, stdin.lock(), &mut stdout.lock())
}

/// Execute the query subcommand with explicit input and output streams.
pub fn query_to<R: Read, W: Write>(args: &QueryArgs, mut stdin: R, out: &mut W) -> Result<u8> {
    let engine = load_engine(&args.catalog)?;

    let sql = match &args.sql {
        Some(sql) => sql.clone(),
        None => {
            let mut sql = String::new();
            stdin
                .read_to_string(&mut sql)
                .context("failed to read SQL from stdin")?;
            sql
        }
    };

    if args.stream {
        let stream = canonical_stream(&engine, &sql)?;
        out.write_all(&stream)?;
        return Ok(0);
    }

    let digest = hash_query(&engine, Some(&sql), Some(i64::from(args.size.bits())))?
        .context("no digest produced")?;
    writeln!(out, "{}", digest.to_hex())?;

    if let Some(expected) = &args.expect {
        if !matches_expected(&digest, expected)? {
            tracing::error!(expected = %expected, actual = %digest.to_hex(), "query digest mismatch");
            return Ok(1);
        }
    }
    Ok(0)
}
