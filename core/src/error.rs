//! Error types for the outlier report client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the report does not exist" from "the server returned an unexpected
//! status." Every variant produced while talking to the server carries the
//! operation context ("fetching outlier report", "parsing outlier reports",
//! ...) so the rendered message reads `<context>: <cause>`.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `OutlierReportClient` and `Api` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No CID was supplied.
    #[error("invalid outlier report CID (none)")]
    MissingCid,

    /// The CID does not match `^/outlier_report/[0-9]+$`.
    #[error("invalid outlier report CID ({0})")]
    InvalidCid(String),

    /// The server returned 404.
    #[error("{context}: resource not found")]
    NotFound { context: &'static str },

    /// The server returned a non-2xx status other than 404.
    #[error("{context}: HTTP {status}: {body}")]
    HttpError {
        context: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced a response.
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: TransportError,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("{context}: {source}")]
    Deserialization {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Errors raised while assembling an `ApiConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API token is required")]
    MissingToken,

    #[error("invalid API URL ({url}): {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("environment variable error: {0}")]
    EnvError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_operation_context() {
        let err = ApiError::NotFound {
            context: "fetching outlier report",
        };
        assert_eq!(err.to_string(), "fetching outlier report: resource not found");

        let err = ApiError::HttpError {
            context: "creating outlier report",
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "creating outlier report: HTTP 500: boom");

        let err = ApiError::Transport {
            context: "deleting outlier report",
            source: TransportError::new("connection refused"),
        };
        assert_eq!(err.to_string(), "deleting outlier report: connection refused");
    }

    #[test]
    fn cid_messages() {
        assert_eq!(ApiError::MissingCid.to_string(), "invalid outlier report CID (none)");
        assert_eq!(
            ApiError::InvalidCid("/outlier_report/abc".to_string()).to_string(),
            "invalid outlier report CID (/outlier_report/abc)"
        );
    }
}
