//! The `fetch` subcommand: log in, download every configured period and
//! save the raw records.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use transcript_lib::{retrieve_transcript, store, Config, Credentials};

const USERNAME_ENV: &str = "UIS_USERNAME";
const PASSWORD_ENV: &str = "UIS_PASSWORD";

#[derive(Args)]
pub struct FetchArgs {
    /// UIS username (student number); defaults to $UIS_USERNAME
    #[arg(long)]
    pub username: Option<String>,

    /// Where to write the raw records; defaults to the configured path
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub async fn run(args: &FetchArgs, config: &Config) -> Result<()> {
    let username = args
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .unwrap_or_default();
    // Password only from the environment so it never lands in shell history.
    let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
    let credentials = Credentials::new(&username, &password)
        .with_context(|| format!("set {} and {}", USERNAME_ENV, PASSWORD_ENV))?;

    eprintln!("Fetching {} periods...", config.periods.len());
    let outcome = retrieve_transcript(config, &credentials).await?;

    for skipped in &outcome.skipped {
        eprintln!(
            "Period {} skipped (status {})",
            skipped.period, skipped.status
        );
    }

    let out = args.out.as_ref().unwrap_or(&config.output.raw);
    store::write_raw(out, &outcome.payloads)?;

    eprintln!(
        "Fetched {} of {} periods",
        outcome.payloads.len(),
        config.periods.len()
    );
    println!("Raw grades saved to {}", out.display());
    Ok(())
}
