use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use agentic_rag::agent::QueryOrchestrator;
use agentic_rag::config::AgentConfig;
use agentic_rag::ingest::IngestPipeline;
use agentic_rag::logging;
use agentic_rag::vector::{QdrantStore, VectorStore};

#[derive(Parser)]
#[command(name = "agentic-rag")]
#[command(about = "Answer questions from an ingested corpus, with a gated web search fallback", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', value_name = "FILE", default_value = "agent.toml")]
    config: PathBuf,

    /// Directory for rolling log files (stderr only when omitted)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, chunk, embed, and upsert the configured data sources
    Ingest,
    /// Ask a question
    Query {
        #[arg(value_name = "QUESTION")]
        question: String,
    },
    /// Delete the vector collection
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AgentConfig::load(Some(&cli.config)).context("failed to load configuration")?;
    logging::init(cli.log_dir.as_deref());

    match cli.command {
        Commands::Ingest => {
            config.require_api_key()?;
            let report = IngestPipeline::from_config(&config)
                .run()
                .await
                .context("ingestion failed")?;
            println!(
                "Ingested {} documents into {} chunks; {} points uploaded, {} total in '{}'.",
                report.documents,
                report.chunks,
                report.uploaded,
                report.total_points,
                config.collection_name
            );
        }
        Commands::Query { question } => {
            config.require_api_key()?;
            let orchestrator = QueryOrchestrator::from_config(&config);

            let start = Instant::now();
            let answer = orchestrator.process_query(&question).await;
            let elapsed = start.elapsed();

            println!("\n--- Final Answer ---\n{answer}");
            println!("\nProcessed in {:.2} seconds.", elapsed.as_secs_f64());
        }
        Commands::Clear => {
            let store = QdrantStore::new(
                &config.qdrant_url,
                &config.collection_name,
                config.vector_size,
            );
            store
                .delete_collection()
                .await
                .context("failed to clear collection")?;
            println!("Collection '{}' cleared.", config.collection_name);
        }
    }

    Ok(())
}
