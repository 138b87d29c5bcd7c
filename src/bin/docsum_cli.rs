use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use docsum::{
    api::SummarizeResponse,
    config,
    extraction::Document,
    logging,
    processing::{PipelineService, SummarizeOptions},
};

#[derive(Parser)]
#[command(
    name = "docsum-cli",
    about = "Summarize a local document and print the result as JSON"
)]
struct Cli {
    /// PDF, DOCX, image, or text file to summarize.
    path: PathBuf,
    /// Word budget for the summary.
    #[arg(long)]
    max_summary_words: Option<usize>,
    /// Number of keywords to return.
    #[arg(long)]
    top_n: Option<usize>,
    /// Language code for the translated fields.
    #[arg(long)]
    target_language: Option<String>,
    /// Skip translation; translated fields come back empty.
    #[arg(long)]
    no_translate: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    config::init_config();
    logging::init_cli_tracing();

    let bytes = fs::read(&cli.path)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    let filename = cli
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let service = PipelineService::from_config(config::get_config())
        .context("failed to initialize pipeline")?;
    let report = service
        .summarize_document(
            Document::new(filename, bytes),
            SummarizeOptions {
                target_language: cli.target_language,
                max_summary_words: cli.max_summary_words,
                top_n: cli.top_n,
                skip_translation: cli.no_translate,
            },
        )
        .await
        .with_context(|| format!("failed to summarize {}", cli.path.display()))?;

    let json = serde_json::to_string_pretty(&SummarizeResponse::from(report))
        .context("failed to serialize report")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write report")?;
    Ok(())
}
