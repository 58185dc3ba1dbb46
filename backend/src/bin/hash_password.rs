//! Print an Argon2id hash for provisioning an account by hand.
//!
//! The password is read from standard input so it stays out of shell history:
//!
//! ```text
//! printf '%s' 'correct horse battery' | hash-password
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Read};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use rental_admin::domain::PASSWORD_MIN_LEN;
use rental_admin::domain::ports::PasswordHasher;
use rental_admin::outbound::security::Argon2PasswordHasher;

/// `hash-password` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hash-password",
    about = "Hash a password read from stdin with Argon2id",
    version
)]
struct CliArgs {
    /// Keep a trailing newline instead of trimming it.
    #[arg(long)]
    keep_newline: bool,
}

fn read_password(mut input: impl Read, keep_newline: bool) -> Result<String> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .wrap_err("failed to read password from stdin")?;
    if !keep_newline {
        let trimmed = raw.trim_end_matches(['\r', '\n']).len();
        raw.truncate(trimmed);
    }
    if raw.chars().count() < PASSWORD_MIN_LEN {
        bail!("password must be at least {PASSWORD_MIN_LEN} characters");
    }
    Ok(raw)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let password = read_password(io::stdin().lock(), args.keep_newline)?;
    let hash = Argon2PasswordHasher::default()
        .hash(&password)
        .wrap_err("hashing failed")?;
    println!("{hash}");
    Ok(())
}
