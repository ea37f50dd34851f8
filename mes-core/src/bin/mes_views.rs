//! mes-views - check a directory of view definitions
//!
//! Usage:
//!   cargo run --bin mes-views --features cli -- --config config/mes.yaml
//!   cargo run --bin mes-views --features cli -- --strict
//!
//! Hooks are checked against an empty registry, so views that declare hooks
//! are reported as failures.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mes_core::config::{MesConfig, DEFAULT_CONFIG_PATH};
use mes_core::model::MemorySchemaProvider;
use mes_core::view::{HookRegistry, MemoryViewStore, ViewDefinitionParser};
use mes_core::ViewLoader;

#[derive(Parser)]
#[command(name = "mes-views")]
#[command(about = "Parse every view definition in the configured directory")]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "MES_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Exit with a failure status if any view fails to parse
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = MesConfig::load(&cli.config)?;

    let schemas = MemorySchemaProvider::new();
    for schema in &config.schemas {
        schemas.load_file(schema)?;
    }

    let parser = ViewDefinitionParser::new(
        Arc::new(schemas),
        Arc::new(HookRegistry::new()),
        Arc::new(MemoryViewStore::new()),
    );
    let report = ViewLoader::from_config(&parser, &config).load_all()?;

    for (plugin, name) in &report.loaded {
        println!("ok      {}.{}", plugin, name);
    }
    for (path, error) in &report.failed {
        println!("FAILED  {}: {}", path.display(), error);
    }
    println!(
        "\n{} loaded, {} failed",
        report.loaded.len(),
        report.failed.len()
    );

    if cli.strict && !report.is_success() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
