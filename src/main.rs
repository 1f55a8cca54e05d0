use clap::Parser;
use std::process::ExitCode;

use index_import_rs::cli::Cli;
use index_import_rs::config::{AppConfig, ImportPlan};
use index_import_rs::error::FAILURE_EXIT_CODE;
use index_import_rs::{logging, pipeline, source};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration (CLI > env vars > TOML > defaults)
    let loaded = AppConfig::load(cli.config.as_deref());
    let log_config = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();

    if let Err(e) = logging::init(&log_config, cli.log_level.as_deref()) {
        // No subscriber to report through
        println!("{e:#}");
        return ExitCode::from(FAILURE_EXIT_CODE);
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            return ExitCode::from(FAILURE_EXIT_CODE);
        }
    };

    let plan = ImportPlan::resolve(&cli, &config);

    let http = match source::client::create_client(&config.http) {
        Ok(http) => http,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {e:#}");
            return ExitCode::from(FAILURE_EXIT_CODE);
        }
    };

    match pipeline::run(&http, &plan, &config).await {
        Ok(report) => {
            tracing::info!(
                "Imported index '{}': {} entries extracted, mapping patched at {}",
                plan.index,
                report.entries.len(),
                report.mapping_file.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            e.exit_code()
        }
    }
}
