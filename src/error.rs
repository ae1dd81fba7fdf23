//! Error taxonomy for conversions.
//!
//! Field-level problems (blank keys, malformed offsets) never surface here;
//! they are counted in [`crate::BuildReport`] and the offending row is skipped.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// Missing or contradictory options, reported before any I/O happens.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A structural problem in the input that cannot be recovered row by row.
    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed json: {0}")]
    Json(#[source] serde_json::Error),

    /// A value could not be canonicalised for hashing; identifiers would be unreliable.
    #[error("cannot canonicalise value for hashing: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ConvertError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
