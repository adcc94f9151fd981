use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use starview_backend::config::StarviewConfig;
use starview_backend::export::StarExporter;
use starview_backend::{GaiaTapClient, StarPipeline};

#[derive(Parser)]
#[command(name = "starview")]
#[command(about = "Fetch nearby Gaia DR3 stars and export them for the 3D viewer")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of stars to fetch (50-2000)
    #[arg(long)]
    count: Option<i64>,

    /// Maximum distance in parsecs (10-100)
    #[arg(long)]
    max_distance: Option<f64>,

    /// Directory for star_data.json and star_data.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print statistics only, do not write export files
    #[arg(long)]
    no_export: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = StarviewConfig::load_optional(&cli.config)?;
    let config_found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(count) = cli.count {
        config.fetch.star_count = count;
    }
    if let Some(max_distance) = cli.max_distance {
        config.fetch.max_distance_pc = max_distance;
    }
    if let Some(output) = &cli.output {
        config.export.output_dir = output.to_string_lossy().into_owned();
    }

    let _logging_guard = starview_backend::logging::init_logging(
        &config.log_dir,
        "starview",
        &config.log_level,
    )?;

    tracing::info!("Starview starting...");
    if !config_found {
        tracing::info!("Config file {} not found, using defaults", cli.config.display());
    }

    let params = config.fetch.params();
    let catalog = GaiaTapClient::new(&config.catalog)?;
    let pipeline = StarPipeline::new(Arc::new(catalog), config.display.clone());

    let field = match pipeline.run(params).await {
        Ok(field) => field,
        Err(e) if e.is_empty_result() => {
            tracing::warn!("{}", e);
            println!("No stars matched: {}", e);
            return Ok(());
        }
        Err(e) => {
            tracing::error!("Failed to fetch star data: {}", e);
            return Err(e.into());
        }
    };

    if !cli.no_export {
        let exporter = StarExporter::new(&config.export.output_dir);
        exporter.export_all(field.stars()).await?;
    }

    match field.stats() {
        Some(stats) => println!("\nStatistics:\n{}", stats),
        None => println!("\nAll {} fetched records were excluded", field.exclusions().len()),
    }

    Ok(())
}
