use anyhow::Context;
use clap::Parser;
use feed_prune::app::webhook;
use feed_prune::utils::{logger, validation::Validate};
use feed_prune::WebhookConfig;

#[derive(Parser)]
#[command(name = "feed-prune-webhook")]
#[command(about = "Prune old package versions whenever the feed reports a new push")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "feed-prune-webhook.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override dry-run setting from config
    #[arg(long)]
    dry_run: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_server_logger(args.verbose);

    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = WebhookConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    if let Some(dry_run) = args.dry_run {
        config.prune.dry_run = dry_run;
        tracing::info!("🔧 Dry run overridden to: {}", dry_run);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "Keeping {} versions per group{}",
        config.prune.retain_count,
        if config.prune.dry_run { " (dry run)" } else { "" }
    );

    webhook::serve(config).await.context("Webhook listener stopped")?;
    Ok(())
}
