mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use transcript_lib::Config;

#[derive(Parser)]
#[command(name = "transcript")]
#[command(about = "Download an academic transcript and render grade reports")]
struct Cli {
    /// Path to a TOML config file (endpoints, periods, output paths)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and download the raw grade records
    Fetch(commands::fetch::FetchArgs),
    /// Render HTML and Markdown reports from downloaded records
    Report(commands::report::ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("transcript_api=info".parse()?)
                .add_directive("transcript_lib=info".parse()?),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Fetch(args) => commands::fetch::run(args, &config).await?,
        Commands::Report(args) => commands::report::run(args, &config)?,
    }

    Ok(())
}
