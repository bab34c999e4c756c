//! Error kinds crossing the loader and host boundaries.

use thiserror::Error;

/// Why a retrieval did not produce a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Non-200 status or transport failure while fetching over the network.
    #[error("request failed")]
    Retrieval { status_code: Option<u16> },

    /// The local file could not be read in full.
    #[error("{message}")]
    Read { message: String },
}

impl LoadError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LoadError::Retrieval { status_code } => *status_code,
            LoadError::Read { .. } => None,
        }
    }

    /// Kind name used for telemetry descriptions and user-facing titles.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Retrieval { .. } => "RetrievalFailure",
            LoadError::Read { .. } => "ReadFailure",
        }
    }
}

/// Raised by the external model consumer for a buffer it could not open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct ConsumerError {
    pub name: String,
    pub message: String,
}

impl ConsumerError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Strict decoding failures. The lenient decoder never produces these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("invalid lead byte {byte:#04x} at offset {offset}")]
    InvalidLead { byte: u8, offset: usize },

    #[error("invalid continuation byte {byte:#04x} at offset {offset}")]
    InvalidContinuation { byte: u8, offset: usize },

    #[error("truncated sequence at offset {offset}")]
    Truncated { offset: usize },

    #[error("overlong or out-of-range sequence at offset {offset}")]
    InvalidCodePoint { offset: usize },
}

/// Outcome of a failed open, after it has been reported and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Consumer(#[from] ConsumerError),
}
