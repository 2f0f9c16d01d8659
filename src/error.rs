//! Error types with fix suggestions
//!
//! Every failure the client can hit maps to one [`SentimentError`] variant.
//! Variants that end an analysis carry a [`SentimentError::user_message`]
//! shown in the error banner; CLI-level failures also print a fix hint.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SentimentError>;

#[derive(Error, Debug)]
pub enum SentimentError {
    // ─────────────────────────────────────────────────────────────
    // Local rejections (no network call)
    // ─────────────────────────────────────────────────────────────
    #[error("Text must be at least {min} characters (got {actual})")]
    Validation { min: usize, actual: usize },

    #[error("Submission blocked: the API is unreachable")]
    Offline,

    // ─────────────────────────────────────────────────────────────
    // Classification endpoint
    // ─────────────────────────────────────────────────────────────
    #[error("Analysis service is warming up (HTTP 429)")]
    TransientService,

    #[error("Analysis service returned HTTP {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response (HTTP {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Ambient
    // ─────────────────────────────────────────────────────────────
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error: {reason}")]
    Config { reason: String },

    #[error("Invalid api_url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SentimentError {
    /// Message for the error banner.
    ///
    /// Malformed bodies read exactly like a status-coded failure; the
    /// user cannot act on the difference.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { min, .. } => {
                format!("Text must be at least {} characters", min)
            }
            Self::Offline | Self::Network(_) => "API unavailable".to_string(),
            Self::TransientService => {
                "The analysis service is warming up. Wait a few seconds and try again.".to_string()
            }
            Self::Http { status } | Self::MalformedResponse { status, .. } => {
                format!("Error {} from the analysis service", status)
            }
            other => other.to_string(),
        }
    }
}

impl FixSuggestion for SentimentError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { .. } => Some("Type a longer text before submitting"),
            Self::Offline => Some("Check that the API is running, or pass --no-gate"),
            Self::TransientService => Some("Wait a few seconds, then submit again"),
            Self::Http { .. } => Some("Check the API logs for the failing request"),
            Self::Network(_) => Some("Check --api-url and that the service is reachable"),
            Self::MalformedResponse { .. } => {
                Some("The endpoint must answer {\"previsao\": string, \"probabilidade\": number}")
            }
            Self::Persistence(_) => Some("Check permissions on the history file directory"),
            Self::Config { .. } => Some("Check the config file and the --config/--api-url overrides"),
            Self::InvalidUrl { .. } => {
                Some("Set api_url to an absolute URL such as http://localhost:8080")
            }
            Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_message_advises_retry() {
        let msg = SentimentError::TransientService.user_message();
        assert!(msg.contains("warming up"));
        assert!(msg.contains("try again"));
    }

    #[test]
    fn malformed_displays_like_http_error() {
        let http = SentimentError::Http { status: 200 }.user_message();
        let malformed = SentimentError::MalformedResponse {
            status: 200,
            reason: "missing field `previsao`".to_string(),
        }
        .user_message();
        assert_eq!(http, malformed);
    }

    #[test]
    fn network_and_offline_share_message() {
        assert_eq!(
            SentimentError::Network("connection refused".into()).user_message(),
            SentimentError::Offline.user_message()
        );
    }

    #[test]
    fn every_user_facing_variant_has_a_fix() {
        let errors = [
            SentimentError::Validation { min: 5, actual: 0 },
            SentimentError::Offline,
            SentimentError::TransientService,
            SentimentError::Http { status: 500 },
            SentimentError::Network("timeout".into()),
        ];
        for e in errors {
            assert!(e.fix_suggestion().is_some(), "{e} has no fix");
        }
    }

    #[test]
    fn config_fixes_do_not_blame_toml_syntax() {
        let client = SentimentError::Config {
            reason: "Failed to build HTTP client".into(),
        };
        assert!(!client.fix_suggestion().unwrap_or_default().contains("TOML"));

        let url = SentimentError::InvalidUrl {
            url: "not a url".into(),
            reason: "relative URL without a base".into(),
        };
        assert!(url.to_string().contains("not a url"));
        assert!(url.fix_suggestion().unwrap_or_default().contains("api_url"));
    }
}
