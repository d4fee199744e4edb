use crate::core::grouping::DEFAULT_RETAIN_COUNT;
use crate::core::ConfigProvider;
use crate::utils::error::{PruneError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_secret, Validate,
};
use regex::Regex;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Settings for the webhook listener, read from TOML.
#[derive(Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub feed: FeedConfig,
    #[serde(default)]
    pub prune: PruneConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_path")]
    pub path: String,
}

#[derive(Clone, Deserialize)]
pub struct FeedConfig {
    pub api_key: String,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PruneConfig {
    #[serde(default = "default_retain")]
    pub retain_count: usize,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_bind() -> String {
    "0.0.0.0:3123".to_string()
}

fn default_path() -> String {
    "/webhook/dotnet-core".to_string()
}

fn default_retain() -> usize {
    DEFAULT_RETAIN_COUNT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_path(),
        }
    }
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            retain_count: default_retain(),
            dry_run: false,
        }
    }
}

impl WebhookConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PruneError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` references (e.g. `${FEED_API_KEY}`) from the environment; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| PruneError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: format!("{}", e),
            })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.feed.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for WebhookConfig {
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        validate_non_empty_string("server.path", &self.server.path)?;
        if !self.server.path.starts_with('/') {
            return Err(PruneError::InvalidConfigValueError {
                field: "server.path".to_string(),
                value: self.server.path.clone(),
                reason: "Path must start with '/'".to_string(),
            });
        }
        validate_secret("feed.api_key", &self.feed.api_key)?;
        validate_positive_number("prune.retain_count", self.prune.retain_count, 1)?;
        if let Some(secs) = self.feed.request_timeout_seconds {
            validate_positive_number("feed.request_timeout_seconds", secs as usize, 1)?;
        }
        Ok(())
    }
}

impl ConfigProvider for WebhookConfig {
    fn retain_count(&self) -> usize {
        self.prune.retain_count
    }

    fn dry_run(&self) -> bool {
        self.prune.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
bind = "127.0.0.1:8080"
path = "/hooks/feed"

[feed]
api_key = "abc"
request_timeout_seconds = 15

[prune]
retain_count = 20
dry_run = true
"#;

        let config = WebhookConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
        assert_eq!(config.server.path, "/hooks/feed");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.retain_count(), 20);
        assert!(config.dry_run());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::from_toml_str("[feed]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:3123");
        assert_eq!(config.server.path, "/webhook/dotnet-core");
        assert_eq!(config.retain_count(), 50);
        assert!(!config.dry_run());
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FEED_PRUNE_TEST_KEY", "from-env");
        let config = WebhookConfig::from_toml_str(
            "[feed]\napi_key = \"${FEED_PRUNE_TEST_KEY}\"\n",
        )
        .unwrap();
        assert_eq!(config.feed.api_key, "from-env");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = WebhookConfig::from_toml_str(
            "[feed]\napi_key = \"${FEED_PRUNE_TEST_UNSET_VAR}\"\n",
        )
        .unwrap();
        assert_eq!(config.feed.api_key, "${FEED_PRUNE_TEST_UNSET_VAR}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_values() {
        let bad_bind =
            WebhookConfig::from_toml_str("[server]\nbind = \"nowhere\"\n[feed]\napi_key = \"k\"\n")
                .unwrap();
        assert!(bad_bind.validate().is_err());

        let bad_path =
            WebhookConfig::from_toml_str("[server]\npath = \"hook\"\n[feed]\napi_key = \"k\"\n")
                .unwrap();
        assert!(bad_path.validate().is_err());

        assert!(WebhookConfig::from_toml_str("[server]\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\napi_key = \"abc\"\n[prune]\nretain_count = 5").unwrap();

        let config = WebhookConfig::from_file(file.path()).unwrap();
        assert_eq!(config.retain_count(), 5);
    }
}
