use anyhow::Context;
use clap::Parser;
use house_sales_etl::config::TomlConfig;
use house_sales_etl::core::ConfigProvider;
use house_sales_etl::utils::{logger, validation::Validate};
use house_sales_etl::{EtlEngine, ListingPipeline, LocalStorage};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Run the house sales extraction from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "etl-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the output directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Show what would be processed without reading or writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based house sales ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(output_path) = args.output_path.clone() {
        tracing::info!("🔧 Output path overridden to: {}", output_path);
        config.load.output_path = output_path;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e).context("invalid configuration");
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = LocalStorage::new(config.input_dir().to_string());
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = ListingPipeline::new(source, sink, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            let message = e.user_friendly_message();
            Err(e).context(message)
        }
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input dir: {}", config.input_dir());
    println!("  Pages: {}", config.input_files().len());
    println!("  Output: {}", config.output_path());

    let formats: Vec<String> = config
        .output_formats()
        .iter()
        .map(|f| f.to_string())
        .collect();
    println!("  Formats: {}", formats.join(", "));
    println!("  On malformed listing: {:?}", config.failure_policy());
    println!("  Concurrent documents: {}", config.concurrent_documents());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📄 Input Pages:");
    let input_dir = Path::new(config.input_dir());
    for file in config.input_files() {
        let status = if input_dir.join(&file).is_file() {
            "✅"
        } else {
            "❌ missing"
        };
        println!("  {} {}", status, file);
    }

    println!();
    println!("🏷️ Class Markers:");
    let markers = config.markers();
    println!("  Main content: {:?}", markers.main_content);
    println!("  Property card: {:?}", markers.property_card);
    println!("  Card content: {:?}", markers.card_content);
    println!(
        "  Fields: {:?}, {:?}, {:?}, {:?}",
        markers.address, markers.bedrooms_and_type, markers.type_only, markers.transaction_table
    );
    println!(
        "  Sale cells: {:?}, {:?}, {:?}",
        markers.price, markers.date_sold, markers.tenure
    );

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    let filenames = config.filenames();
    println!(
        "  Files: {}, {}, {}",
        filenames.json, filenames.csv, filenames.encoded_csv
    );
    if let Some(archive) = config.bundle_filename() {
        println!("  Compression: {} (ZIP)", archive);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
