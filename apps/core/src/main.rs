//! ClauseLens command-line entry point.
//!
//! Logs go to stderr as JSON lines; stdout carries only the result.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use clauselens_core::telemetry::init_tracing;
use clauselens_core::text_extract::{LocalTextExtractor, TextExtractor};
use clauselens_core::{EngineConfig, SupervisorHandle};

#[derive(Parser, Debug)]
#[command(name = "clauselens")]
#[command(version, about = "Clause segmentation, risk scoring and key-term extraction for legal documents")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a document and print the JSON report
    Analyze {
        /// PDF, DOCX, TXT, MD, CSV or JSON file
        file: PathBuf,

        /// ISO 639-1 language code; detected when omitted
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Ask a question about a document
    Ask {
        file: PathBuf,

        question: String,

        #[arg(short, long, default_value = "en")]
        language: String,
    },
}

async fn read_input(file: &PathBuf) -> anyhow::Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    Ok((file_name, bytes))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("clauselens");
    let args = Args::parse();

    let config = EngineConfig::from_env().context("Invalid configuration")?;
    let supervisor = SupervisorHandle::new(config);

    match args.command {
        Command::Analyze { file, language } => {
            let (file_name, bytes) = read_input(&file).await?;
            info!(file_name = %file_name, bytes = bytes.len(), "Analyzing file");
            let report = supervisor.analyze_document(file_name, bytes, language).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Ask {
            file,
            question,
            language,
        } => {
            let (file_name, bytes) = read_input(&file).await?;
            let text = LocalTextExtractor.extract(file_name, bytes).await?;
            let answer = supervisor.answer_question(question, text, language).await?;
            println!("{}", answer);
        }
    }

    supervisor.shutdown().await?;
    Ok(())
}
