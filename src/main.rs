use clap::Parser;
use feed_prune::utils::{logger, validation::Validate};
use feed_prune::{prune_from_metadata, CliConfig, PruneError, PushMetadata};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting feed-prune");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config).await {
        tracing::error!("❌ Prune failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

async fn run(config: CliConfig) -> Result<(), PruneError> {
    config.validate()?;

    let metadata = PushMetadata::from_file(&config.metafile)?;
    tracing::debug!("Metadata: {:?}", metadata);

    let key = config.key.clone();
    let timeout = config.timeout();
    let report = prune_from_metadata(&metadata, &key, timeout, config).await?;

    for line in report.outcome_lines() {
        println!("{}", line);
    }
    println!(
        "✅ {}: {} deleted, {} failed, {} skipped",
        report.plan.package_id,
        report.deleted(),
        report.failed(),
        report.skipped()
    );
    Ok(())
}
