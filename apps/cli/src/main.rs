use std::{
    io::{self, IsTerminal, Read},
    path::PathBuf,
    sync::Arc,
};

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{render_tab, view::tab_title, AnalysisSession, HttpAnalysisGateway};
use shared::domain::OperationKind;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "textlens",
    about = "Summarize, classify, score sentiment and extract keywords from text"
)]
struct Cli {
    /// Settings file (defaults to ./textlens.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Clamped to 1..=10.
    #[arg(long, global = true, allow_negative_numbers = true)]
    max_sentences: Option<i64>,
    /// Clamped to 1..=20.
    #[arg(long, global = true, allow_negative_numbers = true)]
    top_k: Option<i64>,
    #[arg(long, global = true, conflicts_with = "file")]
    text: Option<String>,
    #[arg(long, global = true)]
    file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run every analysis concurrently and print all tabs.
    All,
    Summarize,
    Classify,
    Sentiment,
    Keywords,
}

impl Command {
    fn operation(self) -> Option<OperationKind> {
        match self {
            Command::All => None,
            Command::Summarize => Some(OperationKind::Summary),
            Command::Classify => Some(OperationKind::Classification),
            Command::Sentiment => Some(OperationKind::Sentiment),
            Command::Keywords => Some(OperationKind::Keywords),
        }
    }
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file '{}'", path.display()));
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Enter your text, then end input with Ctrl-D:");
    }
    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .context("failed to read input from stdin")?;
    Ok(text)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(v) = &cli.server_url {
        settings.server_url = v.clone();
    }
    if let Some(v) = cli.max_sentences {
        settings.max_sentences = v;
    }
    if let Some(v) = cli.top_k {
        settings.top_k = v;
    }

    let input = read_input(&cli)?;
    let gateway = HttpAnalysisGateway::with_client(settings.http_client()?, &settings.server_url)?;
    tracing::info!(server_url = %gateway.base_url(), "using analysis service");
    let session = AnalysisSession::with_options(
        Arc::new(gateway),
        settings.request_config(),
        settings.commit_policy,
    );
    session.set_input_text(input);

    if !session.view().can_submit {
        eprintln!("Input text is empty; nothing to analyze.");
        return Ok(());
    }

    match cli.command.operation() {
        Some(kind) => {
            session.run(kind).await;
            print!("{}", session.view());
        }
        None => {
            session.run_all().await;
            let state = session.snapshot();
            for kind in OperationKind::ALL {
                println!("{}", render_tab(&state, kind));
            }
            println!("Last completed: {}", tab_title(state.active_tab()));
        }
    }

    Ok(())
}
