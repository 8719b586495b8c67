//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. An empty
//! annotation or speech result is not an error; see [`crate::client::EmptyResult`].

use std::fmt;
use thiserror::Error;

/// Remote API a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Vision,
    Speech,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Vision => write!(f, "Vision"),
            Endpoint::Speech => write!(f, "Text-to-Speech"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image encoding error: {0}")]
    Encoding(#[from] image::ImageError),

    /// Non-success status (or per-call timeout, with no status) from a remote API.
    /// `body` holds the response bytes exactly as received.
    #[error(
        "{endpoint} API error ({}): {}",
        describe_status(.status),
        String::from_utf8_lossy(.body)
    )]
    RemoteService {
        endpoint: Endpoint,
        status: Option<u16>,
        body: Vec<u8>,
    },

    /// Per-image error object embedded in an otherwise successful annotate response.
    #[error("Vision annotation error (code {code}): {message}")]
    Annotation { code: i32, message: String },

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    pub fn is_remote_service(&self) -> bool {
        matches!(self, Error::RemoteService { .. })
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "timed out".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_service_display_keeps_body_verbatim() {
        let err = Error::RemoteService {
            endpoint: Endpoint::Vision,
            status: Some(403),
            body: b"{\"error\":{\"message\":\"API key not valid\"}}".to_vec(),
        };

        assert_eq!(
            err.to_string(),
            "Vision API error (status 403): {\"error\":{\"message\":\"API key not valid\"}}"
        );
        assert!(err.is_remote_service());
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::RemoteService {
            endpoint: Endpoint::Speech,
            status: None,
            body: b"operation timed out".to_vec(),
        };

        assert_eq!(
            err.to_string(),
            "Text-to-Speech API error (timed out): operation timed out"
        );
    }

    #[test]
    fn test_non_utf8_body_displays_lossily() {
        let err = Error::RemoteService {
            endpoint: Endpoint::Vision,
            status: Some(502),
            body: vec![b'b', b'a', b'd', 0xFF],
        };

        assert_eq!(err.to_string(), "Vision API error (status 502): bad\u{FFFD}");
    }

    #[test]
    fn test_config_error_is_not_remote() {
        assert!(!Error::Config("missing key".to_string()).is_remote_service());
    }
}
