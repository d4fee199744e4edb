use thiserror::Error;

#[derive(Error, Debug)]
pub enum PruneError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Metadata error: {message}")]
    MetadataError { message: String },

    #[error("Feed state request failed with status {status}")]
    FeedStateError { status: u16, body: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl PruneError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            PruneError::ApiError(e) if e.is_timeout() => {
                "The feed server did not answer in time".to_string()
            }
            PruneError::ApiError(e) if e.is_connect() => {
                "Could not connect to the feed server".to_string()
            }
            PruneError::ApiError(e) => format!("Feed request failed: {}", e),
            PruneError::IoError(e) => format!("File access failed: {}", e),
            PruneError::SerializationError(e) => format!("Unexpected JSON: {}", e),
            PruneError::UrlError(e) => format!("Bad feed URL: {}", e),
            PruneError::MetadataError { message } => format!("Bad metadata file: {}", message),
            PruneError::FeedStateError { status, .. } => {
                format!("The feed refused the state request (HTTP {})", status)
            }
            PruneError::ConfigValidationError { field, message } => {
                format!("Invalid configuration for {}: {}", field, message)
            }
            PruneError::MissingConfigError { field } => {
                format!("Missing configuration value: {}", field)
            }
            PruneError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PruneError::ApiError(_) => "Check the feed URL and your network connection",
            PruneError::IoError(_) => "Check that the file exists and is readable",
            PruneError::SerializationError(_) => {
                "The feed-state response is not the expected JSON; check that the feed URL points at a v2 feed"
            }
            PruneError::MetadataError { .. } => {
                "The metadata file must contain Payload.FeedUrl and Payload.PackageIdentifier"
            }
            PruneError::UrlError(_) => "Use an absolute http(s) URL for the feed",
            PruneError::FeedStateError { status: 401 | 403, .. } => {
                "Check that the API key is valid for this feed"
            }
            PruneError::FeedStateError { .. } => "Check that the feed URL points at a v2 feed",
            PruneError::ConfigValidationError { .. }
            | PruneError::MissingConfigError { .. }
            | PruneError::InvalidConfigValueError { .. } => {
                "Review the command line flags or configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PruneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_state_auth_suggestion() {
        let err = PruneError::FeedStateError {
            status: 401,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().contains("API key"));
        assert!(err.user_friendly_message().contains("401"));

        let err = PruneError::FeedStateError {
            status: 404,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().contains("v2 feed"));
    }

    #[test]
    fn test_feed_state_json_suggestion_differs_from_metadata() {
        let parse_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = PruneError::SerializationError(parse_err);
        assert!(err.recovery_suggestion().contains("feed-state response"));
        assert!(!err.recovery_suggestion().contains("Payload.FeedUrl"));

        let err = PruneError::MetadataError {
            message: "missing field `FeedUrl`".to_string(),
        };
        assert!(err.recovery_suggestion().contains("Payload.FeedUrl"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = PruneError::InvalidConfigValueError {
            field: "retain".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value '0' for 'retain': Value must be at least 1"
        );
    }
}
