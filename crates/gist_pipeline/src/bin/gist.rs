use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use content_loaders::{LoaderRegistry, SourceInput, SourceKind};
use gist_pipeline::{
    openai::OpenAIClient,
    progress::TracingObserver,
    tracing::init_tracing_subscriber,
    types::{ModelConfig, SummarizeRequest},
    SummaryPipelineBuilder,
};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "gist", about = "Summarizes long-form content with an LLM")]
struct Cli {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_key: String,

    /// Model to summarize with
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Model context window in tokens
    #[arg(long, default_value = "128000")]
    max_context_tokens: usize,

    /// Concurrent per-chunk summarization calls
    #[arg(long, default_value = "4")]
    map_concurrency: usize,

    /// Write the summary to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a YouTube video transcript
    Video { url: String },
    /// Summarize a web page
    Web { url: String },
    /// Summarize a PDF file
    Pdf { file: PathBuf },
    /// Summarize a Word document
    Docx { file: PathBuf },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let (source_kind, input) = match &cli.command {
        Command::Video { url } => (SourceKind::Video, SourceInput::url(url)),
        Command::Web { url } => (SourceKind::WebPage, SourceInput::url(url)),
        Command::Pdf { file } => (SourceKind::Pdf, read_upload(file)?),
        Command::Docx { file } => (SourceKind::Docx, read_upload(file)?),
    };

    let request = SummarizeRequest {
        source_kind,
        input,
        model_config: ModelConfig::new(&cli.model, cli.max_context_tokens),
        credential: cli.openai_key.clone(),
    };

    let pipeline = SummaryPipelineBuilder::new()
        .loader(LoaderRegistry::new())
        .model(OpenAIClient::new(&cli.openai_key))
        .observer(TracingObserver)
        .map_concurrency(cli.map_concurrency)
        .build();

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted; abandoning in-flight work");
                cancel.cancel();
            }
        }
    });

    let summary = pipeline.run(&request, &cancel).await?;
    tracing::info!(strategy = ?summary.strategy_used, "Summarization finished");

    match cli.output {
        Some(path) => std::fs::write(&path, summary.as_bytes())
            .with_context(|| format!("failed to write summary to {}", path.display()))?,
        None => println!("{}", summary.text),
    }

    Ok(())
}

fn read_upload(path: &Path) -> anyhow::Result<SourceInput> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(SourceInput::bytes(name, data))
}
