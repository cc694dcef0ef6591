use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single pre-registration request. Never fatal: callers log it and
/// stay on the form.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend rejected request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("response did not include a qr_base64 payload")]
    MissingQr,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },
    #[error("acting user id must not be empty")]
    EmptyUserId,
}

#[derive(Debug, Error)]
pub enum QrError {
    #[error("qr payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("qr payload is not a PNG image")]
    NotPng,
    #[error("failed to write qr image to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
