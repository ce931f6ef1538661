//! CLI entrypoint for crewcall
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crewcall_application::{
    ConfirmActionUseCase, DispatchConfig, DocumentStorePort, ToolDispatcher, ToolSchemaPort,
    build_catalog,
};
use crewcall_domain::ToolCall;
use crewcall_infrastructure::{
    CachedDocumentStore, ConfigLoader, JsonToolSchema, MemoryBackend, StoreBackend, SystemClock,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crewcall", about = "Staffing back-office assistant", version)]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tool catalog as provider-ready JSON schemas
    Tools,

    /// Execute a single tool call against the seeded store
    Call {
        /// Operation name (e.g. get_bookings, update_staff_by_name)
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        /// JSON seed file for the in-memory store (overrides config)
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Immediately confirm a pending write instead of printing it
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref())?;
    config.validate()?;

    match cli.command {
        Command::Tools => {
            let schemas = JsonToolSchema::new().catalog_schema(&build_catalog());
            println!("{}", serde_json::to_string_pretty(&schemas)?);
            Ok(())
        }
        Command::Call { name, args, seed, yes } => {
            let arguments = parse_args(&args)?;

            let seed_file = seed.or(config.data.seed_file);
            let backend: Arc<dyn StoreBackend> = Arc::new(load_backend(seed_file.as_ref())?);
            let store: Arc<dyn DocumentStorePort> = Arc::new(CachedDocumentStore::with_ttl(
                backend,
                Arc::new(SystemClock),
                config.store.cache_ttl_seconds,
            ));

            let dispatcher = ToolDispatcher::with_config(
                store.clone(),
                DispatchConfig {
                    suggestion_limit: config.dispatch.suggestion_limit,
                    recommend_limit: config.dispatch.recommend_limit,
                },
            );
            let call = ToolCall {
                tool_name: name,
                arguments,
            };
            info!(tool = %call.tool_name, "dispatching tool call");
            let outcome = dispatcher.execute(&call).await?;

            if yes {
                if let Some(action) = outcome.pending_action() {
                    let applied = ConfirmActionUseCase::new(store)
                        .execute(action.clone())
                        .await?;
                    println!("{}", serde_json::to_string_pretty(&applied)?);
                    return Ok(());
                }
            }

            println!("{}", serde_json::to_string_pretty(&outcome.into_value())?);
            Ok(())
        }
    }
}

fn parse_args(raw: &str) -> Result<serde_json::Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("--args must be valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("--args must be a JSON object"),
    }
}

fn load_backend(seed_file: Option<&PathBuf>) -> Result<MemoryBackend> {
    match seed_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading seed file {}", path.display()))?;
            let seed: Value = serde_json::from_str(&raw)
                .with_context(|| format!("parsing seed file {}", path.display()))?;
            Ok(MemoryBackend::from_seed(&seed)?)
        }
        None => Ok(MemoryBackend::new()),
    }
}
