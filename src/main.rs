use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ramp_core::{Agent, Config};
use ramp_kb::document::PdfLoader;
use ramp_kb::{IngestionPipeline, PipelineConfig, QdrantOps};
use ramp_llm::openai::OpenAiProvider;
use ramp_tools::{KnowledgeTools, ToolRegistry};

#[derive(Parser)]
#[command(name = "ramp", version, about = "HR onboarding assistant")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "ramp.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the knowledge collection from the data directory
    Ingest,
    /// Ask a single question and print the answer
    Ask { question: String },
    /// Interactive conversation
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    config.resolve_secrets();
    // The one required credential; nothing runs without it.
    let api_key = config.require_api_key()?.to_owned();

    let provider = OpenAiProvider::new(
        api_key,
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.max_tokens,
        Some(config.llm.embedding_model.clone()),
    );
    let store = QdrantOps::new(&config.memory.qdrant_url)
        .map_err(|e| anyhow::anyhow!("qdrant client: {e}"))?;

    match cli.command {
        Command::Ingest => {
            let pipeline_config = PipelineConfig {
                data_dir: config.ingest.data_dir.clone(),
                collection: config.memory.collection.clone(),
                chunk_size: config.ingest.chunk_size,
                chunk_overlap: config.ingest.chunk_overlap,
                min_chunk_chars: config.ingest.min_chunk_chars,
                embed_batch_size: config.ingest.embed_batch_size,
                vector_size: config.llm.embedding_dimension,
            };
            let pipeline = IngestionPipeline::new(
                pipeline_config,
                Box::new(PdfLoader::default()),
                &provider,
                &store,
            );
            let report = pipeline.run().await.context("ingestion failed")?;
            print!("{report}");
        }
        Command::Ask { question } => {
            let mut agent = build_agent(&config, provider, store);
            let answer = agent.run_turn(&question).await?;
            println!("{answer}");
        }
        Command::Chat => {
            let mut agent = build_agent(&config, provider, store);
            println!(
                "{} v{} (type 'exit' to quit)",
                config.agent.name,
                env!("CARGO_PKG_VERSION")
            );
            loop {
                let input: String = dialoguer::Input::new()
                    .with_prompt("you")
                    .allow_empty(true)
                    .interact_text()?;
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "exit" || trimmed == "quit" {
                    break;
                }
                match agent.run_turn(trimmed).await {
                    Ok(answer) => println!("{answer}"),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
        }
    }

    Ok(())
}

fn build_agent(
    config: &Config,
    provider: OpenAiProvider,
    store: QdrantOps,
) -> Agent<OpenAiProvider, KnowledgeTools<OpenAiProvider, QdrantOps>> {
    let tools = KnowledgeTools::new(
        provider.clone(),
        store,
        config.memory.collection.clone(),
        config.ingest.data_dir.join("checklists/onboarding_master.json"),
        config.ingest.data_dir.join("raw/employees.csv"),
    );
    let registry = ToolRegistry::from_definitions(
        KnowledgeTools::<OpenAiProvider, QdrantOps>::definitions(),
    );
    Agent::new(provider, tools, registry, config.agent.system_prompt.clone())
        .with_max_tool_hops(config.agent.max_tool_hops)
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
