//! # Hash Subcommand
//!
//! SHA3 digests of files, a literal string, or standard input, printed in
//! the `<hex>  <name>` layout of `sha3sum`.
//!
//! ## Usage
//!
//! ```bash
//! shathree hash README.md Cargo.toml
//! shathree hash --size 512 --text "abc"
//! cat dump.sql | shathree hash --expect 3a985da7...
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use shathree_core::{DigestSize, Sha3Digest};
use shathree_crypto::{sha3_digest, sha3_reader};

use crate::{matches_expected, parse_size};

/// Arguments for the `shathree hash` subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Digest size in bits: 224, 256, 384 or 512.
    #[arg(long, short = 's', value_parser = parse_size, default_value = "256")]
    pub size: DigestSize,

    /// Hash this string (as UTF-8 bytes) instead of reading input.
    #[arg(long, conflicts_with = "files")]
    pub text: Option<String>,

    /// Expected digest (hex or `sha3-<bits>:<hex>`). Exit 1 on mismatch.
    #[arg(long, value_name = "DIGEST")]
    pub expect: Option<String>,

    /// Files to hash. Standard input is read when none are given or for `-`.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Execute the hash subcommand against the process's stdin and stdout.
pub fn run_hash(args: &HashArgs) -> Result<u8> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    hash_to(args, stdin.lock(), &mut stdout.lock())
}

/// Execute the hash subcommand with explicit input and output streams.
pub fn hash_to<R: Read, W: Write>(args: &HashArgs, mut stdin: R, out: &mut W) -> Result<u8> {
    let mut outputs: Vec<(Sha3Digest, String)> = Vec::new();

    if let Some(text) = &args.text {
        outputs.push((sha3_digest(text.as_bytes(), args.size), String::new()));
    } else if args.files.is_empty() {
        let digest = sha3_reader(&mut stdin, args.size).context("failed to read stdin")?;
        outputs.push((digest, "-".to_string()));
    } else {
        for path in &args.files {
            let digest = if path == Path::new("-") {
                sha3_reader(&mut stdin, args.size).context("failed to read stdin")?
            } else {
                hash_file(path, args.size)?
            };
            outputs.push((digest, path.display().to_string()));
        }
    }

    let mut code = 0u8;
    for (digest, name) in &outputs {
        if name.is_empty() {
            writeln!(out, "{}", digest.to_hex())?;
        } else {
            writeln!(out, "{}  {name}", digest.to_hex())?;
        }
        if let Some(expected) = &args.expect {
            if !matches_expected(digest, expected)? {
                tracing::error!(input = %name, expected = %expected, actual = %digest.to_hex(), "digest mismatch");
                code = 1;
            }
        }
    }
    Ok(code)
}

/// Stream a file through the sponge.
fn hash_file(path: &Path, size: DigestSize) -> Result<Sha3Digest> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    tracing::debug!(path = %path.display(), %size, "hashing file");
    sha3_reader(BufReader::new(file), size)
        .with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_256: &str = "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532";
    const EMPTY_256: &str = "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a";

    fn args() -> HashArgs {
        HashArgs {
            size: DigestSize::Sha3_256,
            text: None,
            expect: None,
            files: Vec::new(),
        }
    }

    fn run(args: &HashArgs, stdin: &[u8]) -> (u8, String) {
        let mut out = Vec::new();
        let code = hash_to(args, stdin, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn text_prints_bare_digest() {
        let args = HashArgs {
            text: Some("abc".to_string()),
            ..args()
        };
        assert_eq!(run(&args, b""), (0, format!("{ABC_256}\n")));
    }

    #[test]
    fn stdin_when_no_files() {
        assert_eq!(run(&args(), b"abc"), (0, format!("{ABC_256}  -\n")));
        assert_eq!(run(&args(), b""), (0, format!("{EMPTY_256}  -\n")));
    }

    #[test]
    fn files_in_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"abc").unwrap();
        std::fs::write(&b, b"").unwrap();

        let args = HashArgs {
            files: vec![a.clone(), b.clone()],
            ..args()
        };
        let (code, out) = run(&args, b"");
        assert_eq!(code, 0);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!("{ABC_256}  {}", a.display()));
        assert_eq!(lines[1], format!("{EMPTY_256}  {}", b.display()));
    }

    #[test]
    fn dash_reads_stdin() {
        let args = HashArgs {
            files: vec![PathBuf::from("-")],
            ..args()
        };
        assert_eq!(run(&args, b"abc"), (0, format!("{ABC_256}  -\n")));
    }

    #[test]
    fn size_selects_digest_length() {
        let args = HashArgs {
            size: DigestSize::Sha3_512,
            text: Some("abc".to_string()),
            ..args()
        };
        let (_, out) = run(&args, b"");
        assert_eq!(out.trim().len(), 128);
    }

    #[test]
    fn expect_match_exits_zero() {
        let args = HashArgs {
            text: Some("abc".to_string()),
            expect: Some(ABC_256.to_string()),
            ..args()
        };
        assert_eq!(run(&args, b"").0, 0);
    }

    #[test]
    fn expect_mismatch_exits_one() {
        let args = HashArgs {
            text: Some("abd".to_string()),
            expect: Some(ABC_256.to_string()),
            ..args()
        };
        assert_eq!(run(&args, b"").0, 1);
    }

    #[test]
    fn malformed_expect_is_an_error() {
        let args = HashArgs {
            text: Some("abc".to_string()),
            expect: Some("xyz".to_string()),
            ..args()
        };
        assert!(hash_to(&args, &b""[..], &mut Vec::new()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = HashArgs {
            files: vec![dir.path().join("missing")],
            ..args()
        };
        let err = hash_to(&args, &b""[..], &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to open"));
    }
}
