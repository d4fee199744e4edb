pub mod toml_config;

use crate::core::grouping::DEFAULT_RETAIN_COUNT;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, validate_secret, Validate};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "feed-prune"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Delete old package versions from a feed, keeping the newest per version group")
)]
pub struct CliConfig {
    /// Push metadata JSON with Payload.FeedUrl and Payload.PackageIdentifier
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub metafile: PathBuf,

    /// Feed API key
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub key: String,

    /// Versions to keep in each release/preview group
    #[cfg_attr(feature = "cli", arg(short, long, default_value_t = DEFAULT_RETAIN_COUNT))]
    pub retain: usize,

    /// List what would be deleted without deleting anything
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    /// Per-request timeout in seconds
    #[cfg_attr(feature = "cli", arg(long))]
    pub timeout_secs: Option<u64>,

    /// Enable verbose output
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub verbose: bool,
}

impl CliConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("metafile", &self.metafile)
            .field("key", &"<redacted>")
            .field("retain", &self.retain)
            .field("dry_run", &self.dry_run)
            .field("timeout_secs", &self.timeout_secs)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("metafile", &self.metafile.to_string_lossy())?;
        validate_secret("key", &self.key)?;
        validate_positive_number("retain", self.retain, 1)?;
        if let Some(secs) = self.timeout_secs {
            validate_positive_number("timeout_secs", secs as usize, 1)?;
        }
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn retain_count(&self) -> usize {
        self.retain
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_flags() {
        let config =
            CliConfig::try_parse_from(["feed-prune", "-m", "push.json", "-k", "abc"]).unwrap();
        assert_eq!(config.metafile, PathBuf::from("push.json"));
        assert_eq!(config.key, "abc");
        assert_eq!(config.retain, 50);
        assert!(!config.dry_run);
        assert!(config.timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_long_flags() {
        let config = CliConfig::try_parse_from([
            "feed-prune",
            "--metafile",
            "push.json",
            "--key",
            "abc",
            "--retain",
            "10",
            "--dry-run",
            "--timeout-secs",
            "30",
        ])
        .unwrap();
        assert_eq!(config.retain_count(), 10);
        assert!(ConfigProvider::dry_run(&config));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_metafile_and_key_required() {
        assert!(CliConfig::try_parse_from(["feed-prune", "-k", "abc"]).is_err());
        assert!(CliConfig::try_parse_from(["feed-prune", "-m", "push.json"]).is_err());
    }

    #[test]
    fn test_zero_retain_rejected() {
        let config =
            CliConfig::try_parse_from(["feed-prune", "-m", "push.json", "-k", "abc", "-r", "0"])
                .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let config =
            CliConfig::try_parse_from(["feed-prune", "-m", "push.json", "-k", "topsecret"]).unwrap();
        assert!(!format!("{:?}", config).contains("topsecret"));
    }
}
