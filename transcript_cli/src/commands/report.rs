//! The `report` subcommand: group the raw records by period display name
//! and render the HTML and Markdown reports.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use transcript_lib::{group_by_display_name, store, Config};

use crate::output::{print_summary_table, render_html, render_markdown};

#[derive(Args)]
pub struct ReportArgs {
    /// Raw records written by `fetch`; defaults to the configured path
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// HTML report path; defaults to the configured path
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Markdown report path; defaults to the configured path
    #[arg(long)]
    pub markdown: Option<PathBuf>,

    /// Also write the grouped records as JSON to this path
    #[arg(long)]
    pub grouped: Option<PathBuf>,
}

pub fn run(args: &ReportArgs, config: &Config) -> Result<()> {
    let input = args.input.as_ref().unwrap_or(&config.output.raw);
    let payloads = store::read_raw(input)?;
    let dataset = group_by_display_name(&payloads);
    eprintln!(
        "Loaded {} period blocks, {} display periods",
        payloads.len(),
        dataset.len()
    );

    let html_path = args.html.as_ref().unwrap_or(&config.output.html);
    let today = chrono::Local::now().date_naive();
    store::write_text(html_path, &render_html(&dataset, today))?;
    println!("HTML report saved to {}", html_path.display());

    let md_path = args.markdown.as_ref().unwrap_or(&config.output.markdown);
    store::write_text(md_path, &render_markdown(&dataset))?;
    println!("Markdown report saved to {}", md_path.display());

    if let Some(ref grouped) = args.grouped {
        store::write_json(grouped, &dataset)?;
        println!("Grouped records saved to {}", grouped.display());
    }

    print_summary_table(&dataset);
    Ok(())
}
