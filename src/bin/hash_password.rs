//! Admin Password Hasher
//!
//! Produces the bcrypt value expected in `ADMIN_PASSWORD_HASH`, or checks a
//! password against an existing hash.
//!
//! Usage:
//!   cargo run --bin hash_password -- 'correct horse battery staple'
//!   ADMIN_PASSWORD='...' cargo run --bin hash_password -- --cost 12
//!   cargo run --bin hash_password -- 'candidate' --verify '$2b$12$...'

use anyhow::{bail, Result};
use clap::Parser;
use portfolio_backend::auth::AdminPassword;

/// Generate or check the admin password hash
#[derive(Parser, Debug)]
#[command(name = "hash_password")]
#[command(about = "Hash the admin password for ADMIN_PASSWORD_HASH")]
struct Cli {
    /// Plaintext password (falls back to ADMIN_PASSWORD)
    #[arg(env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// bcrypt cost factor
    #[arg(short, long, default_value_t = bcrypt::DEFAULT_COST)]
    cost: u32,

    /// Check the password against this hash instead of producing a new one
    #[arg(long)]
    verify: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.password.is_empty() {
        bail!("Refusing to hash an empty password");
    }

    if let Some(reference) = cli.verify {
        let matches = AdminPassword::new(Some(reference)).verify(&cli.password);
        println!("{}", if matches { "match" } else { "no match" });
        if !matches {
            std::process::exit(1);
        }
        return Ok(());
    }

    if !(4..=31).contains(&cli.cost) {
        bail!("bcrypt cost must be between 4 and 31");
    }

    println!("{}", AdminPassword::hash(&cli.password, cli.cost)?);
    Ok(())
}
