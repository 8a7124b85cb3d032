//! # Registry Node
//!
//! Command-line entry point. Logs go to stderr; stdout carries only results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use registry_node::container::{load_config, ConfigOverrides, RegistryContainer};
use registry_node::serve;
use username_registry::{RegistryRequest, RegistryResponse};

#[derive(Parser, Debug)]
#[command(name = "registry-node")]
#[command(about = "Username registry backed by adaptive Bloom filters")]
struct Cli {
    /// Directory holding usernames-<millis>.bloom files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Items the first generation is sized for
    #[arg(long, global = true)]
    expected_items: Option<usize>,

    /// False positive rate that triggers growth
    #[arg(long, global = true)]
    target_fpr: Option<f64>,

    /// Size multiplier for each new generation
    #[arg(long, global = true)]
    growth_factor: Option<f64>,

    /// Namespace for cache keys
    #[arg(long, global = true)]
    cache_prefix: Option<String>,

    /// Re-check suggestions against the registry before returning them
    #[arg(long, global = true)]
    verify_suggestions: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a username is available
    Check { name: String },
    /// Register a username for an identity
    Register { name: String, identity: String },
    /// Print registry statistics
    Stats,
    /// Answer line-delimited JSON requests on stdin until it closes
    Serve,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            expected_items: self.expected_items,
            target_fpr: self.target_fpr,
            growth_factor: self.growth_factor,
            cache_prefix: self.cache_prefix.clone(),
            verify_suggestions: self.verify_suggestions,
        }
    }
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
    Ok(())
}

fn print_response(response: &RegistryResponse) -> Result<()> {
    println!("{}", serde_json::to_string(response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = cli
        .overrides()
        .apply(load_config())
        .context("invalid registry configuration")?;

    let container = RegistryContainer::build(config)
        .await
        .context("failed to open username registry")?;
    let handler = container.handler();

    let request = match cli.command {
        Command::Check { name } => RegistryRequest::Check { name },
        Command::Register { name, identity } => RegistryRequest::Register { name, identity },
        Command::Stats => RegistryRequest::Stats,
        Command::Serve => {
            info!("Serving requests on stdin");
            let stdin = BufReader::new(tokio::io::stdin());
            serve(&handler, stdin, tokio::io::stdout())
                .await
                .context("request loop failed")?;
            container.service.drain_notifications().await;
            return Ok(());
        }
    };

    let response = handler.handle(request).await;
    // Runtime shutdown would drop a pending profile update
    container.service.drain_notifications().await;
    print_response(&response)?;

    if matches!(response, RegistryResponse::Error(_)) {
        std::process::exit(1);
    }
    Ok(())
}
