//! Aggregator error taxonomy.
//!
//! Deliberately small: fetch failures and malformed entries never surface
//! here (they degrade to absent input inside the pipeline). What remains
//! is broken configuration, an undecodable whitelist file, and I/O on the
//! files we own.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to read settings '{path}': {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings '{path}': {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("whitelist '{path}' exists but could not be decoded: {reason}")]
    Whitelist { path: PathBuf, reason: String },

    #[error("failed to write '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AggregateError>;
