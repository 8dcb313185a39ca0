//! Error types for form submissions.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a submission did not produce its success payload.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The backend answered with a non-success status and an `error` field.
    #[error("{message}")]
    Server {
        /// HTTP status of the response.
        status: StatusCode,
        /// Text of the `error` field.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON the handler expected.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    /// The submission was cancelled before the response arrived.
    #[error("request cancelled")]
    Cancelled,
}

impl SubmitError {
    /// Server-reported errors are rendered with the short error prefix;
    /// everything else falls into the handler's catch path.
    pub fn is_server_reported(&self) -> bool {
        matches!(self, SubmitError::Server { .. })
    }
}

/// Invalid controller configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base url {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("invalid timeout {value:?}: expected whole seconds")]
    InvalidTimeout { value: String },

    #[error("invalid response order {value:?}: expected last-resolved or latest-issued")]
    InvalidResponseOrder { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_message_only() {
        let err = SubmitError::Server {
            status: StatusCode::BAD_REQUEST,
            message: "bad request".to_string(),
        };
        assert_eq!(err.to_string(), "bad request");
        assert!(err.is_server_reported());
    }

    #[test]
    fn parse_error_is_catch_path() {
        let err: SubmitError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert!(!err.is_server_reported());
    }
}
