use aws_sdk_s3::Client as S3Client;
use clap::Parser;
use field_monitor::utils::error::ErrorSeverity;
use field_monitor::utils::{logger, monitor::SystemMonitor};
use field_monitor::{
    Cli, CsvFieldSource, FieldMonitor, ImageStore, LocalStorage, MonitorConfig, Result,
    RunOutcome, S3Storage,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting field-monitor");
    if cli.verbose {
        tracing::debug!("CLI options: {:?}", cli);
    }

    let config = match MonitorConfig::from_env_with_overrides(
        cli.csv_url.clone(),
        cli.media_root.clone(),
    ) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    let system_monitor = SystemMonitor::new(cli.monitor);
    if system_monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let outcome = if config.use_mock_s3 {
        // Validation guarantees media_root is present in mock mode.
        let root = config
            .media_root
            .clone()
            .expect("media_root validated for mock mode");
        tracing::info!("Using local storage at {}", root.display());
        let storage = Arc::new(LocalStorage::new(root));
        run_monitor(storage, Arc::clone(&config)).await
    } else {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let storage = Arc::new(S3Storage::new(
            S3Client::new(&aws_config),
            config.bucket_name.clone(),
        ));
        tracing::info!("Using S3 bucket {}", config.bucket_name);
        run_monitor(storage, Arc::clone(&config)).await
    };

    system_monitor.log_final_stats();

    match outcome {
        Ok(outcome) => {
            println!("{}", serde_json::to_string(&outcome)?);
            if outcome.is_success() {
                tracing::info!("✅ Monitoring fields completed successfully.");
            } else {
                tracing::error!(
                    "❌ {} of {} fields failed",
                    outcome.failures.len(),
                    outcome.attempted
                );
                for failure in &outcome.failures {
                    tracing::error!("  field {}: {}", failure.field_id, failure.error);
                }
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Monitoring run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_monitor<S: ImageStore + 'static>(
    storage: Arc<S>,
    config: Arc<MonitorConfig>,
) -> Result<RunOutcome> {
    let source = CsvFieldSource::new(Arc::clone(&config));
    let monitor = FieldMonitor::new(config, storage, source)?;
    monitor.run().await
}
