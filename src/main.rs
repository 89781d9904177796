use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use finch_oapi_generator::{generate, GeneratorConfig, OptionalPathParams};
use openapiv3::OpenAPI;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to OpenApi spec file
    spec: PathBuf,
    /// Generator config file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides `optional-path-params` from the config file
    #[arg(long, value_enum)]
    optional_path_params: Option<OptionalPathParams>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(policy) = cli.optional_path_params {
        config.optional_path_params = policy;
    }

    let content = std::fs::read_to_string(&cli.spec)?;
    let schema = serde_yaml::from_str::<OpenAPI>(&content)?;

    let routes = generate(&schema, &config)?;
    let output = match cli.format {
        Format::Json => serde_json::to_string_pretty(&routes)?,
        Format::Yaml => serde_yaml::to_string(&routes)?,
    };
    println!("{}", output);

    Ok(())
}
