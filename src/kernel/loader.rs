//! Asynchronous retrieval of model bytes.
//!
//! Each [`ResourceLoader::load`] call is independent: no shared buffers, no
//! dedupe, no timeout, no retries and no cancellation. Two loads started
//! back to back both run to completion and each returns only its own
//! buffer; discarding stale results is the caller's job.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::LoadError;
use super::origin::{FileHandle, LoadOrigin};
use super::telemetry::{ErrorReport, TelemetryReporter};

/// How the response body should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Raw bytes, untouched.
    Binary,
    /// Read as text, then re-encoded to its UTF-8 bytes.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

/// One GET per call. Implementations never send a request body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, mode: ResponseMode) -> Result<TransportResponse, TransportError>;
}

/// A fully retrieved buffer and the name it should be shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBuffer {
    pub bytes: Vec<u8>,
    pub name: String,
}

pub type LoadResult = Result<LoadedBuffer, LoadError>;

/// Model formats read as raw bytes by [`ResourceLoader::load`] when no list
/// is configured.
pub const DEFAULT_BINARY_SUFFIXES: &[&str] = &[
    ".pb",
    ".onnx",
    ".ort",
    ".tflite",
    ".lite",
    ".tfl",
    ".h5",
    ".hdf5",
    ".keras",
    ".mlmodel",
    ".caffemodel",
    ".pt",
    ".pth",
    ".pkl",
    ".bin",
    ".safetensors",
    ".gguf",
    ".params",
    ".nnp",
];

pub struct ResourceLoader<T: Transport> {
    transport: Arc<T>,
    telemetry: TelemetryReporter,
    binary_suffixes: Vec<String>,
}

impl<T: Transport> Clone for ResourceLoader<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            telemetry: self.telemetry.clone(),
            binary_suffixes: self.binary_suffixes.clone(),
        }
    }
}

impl<T: Transport> ResourceLoader<T> {
    pub fn new(transport: T, telemetry: TelemetryReporter) -> Self {
        Self {
            transport: Arc::new(transport),
            telemetry,
            binary_suffixes: DEFAULT_BINARY_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_binary_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn telemetry(&self) -> &TelemetryReporter {
        &self.telemetry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Binary when the locator's path ends in a known model suffix.
    pub fn response_mode(&self, url: &str) -> ResponseMode {
        let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url);
        if self.binary_suffixes.iter().any(|s| path.ends_with(s.as_str())) {
            ResponseMode::Binary
        } else {
            ResponseMode::Text
        }
    }

    /// Network bodies are read in the mode the locator's suffix selects.
    pub async fn load(&self, origin: LoadOrigin) -> LoadResult {
        self.load_with(origin, None).await
    }

    /// Network bodies are always read as raw bytes. Model buffers go
    /// through here so no suffix can route them through a text decode.
    pub async fn load_binary(&self, origin: LoadOrigin) -> LoadResult {
        self.load_with(origin, Some(ResponseMode::Binary)).await
    }

    async fn load_with(&self, origin: LoadOrigin, mode: Option<ResponseMode>) -> LoadResult {
        let load_id = Uuid::new_v4();
        info!("[LOAD-{}] Starting {}", load_id, origin);

        let result = match origin {
            LoadOrigin::Network { url, identifier } => {
                let mode = mode.unwrap_or_else(|| self.response_mode(&url));
                self.fetch(&url, identifier, mode).await
            }
            LoadOrigin::LocalFile { handle } => read_file(handle).await,
        };

        match &result {
            Ok(buffer) => info!(
                "[LOAD-{}] Loaded '{}' ({} bytes)",
                load_id,
                buffer.name,
                buffer.bytes.len()
            ),
            Err(e) => {
                warn!("[LOAD-{}] Failed: {} (status {:?})", load_id, e, e.status_code());
                self.telemetry.exception(&ErrorReport::from(e), false);
            }
        }
        result
    }

    async fn fetch(&self, url: &str, identifier: String, mode: ResponseMode) -> LoadResult {
        match self.transport.get(url, mode).await {
            Ok(response) if response.status == 200 => Ok(LoadedBuffer {
                bytes: response.body,
                name: identifier,
            }),
            Ok(response) => Err(LoadError::Retrieval {
                status_code: Some(response.status),
            }),
            Err(e) => {
                warn!("Transport error for {}: {}", url, e.message);
                Err(LoadError::Retrieval { status_code: e.status })
            }
        }
    }
}

async fn read_file(handle: FileHandle) -> LoadResult {
    match tokio::fs::read(handle.path()).await {
        Ok(bytes) => Ok(LoadedBuffer {
            bytes,
            name: handle.name().to_string(),
        }),
        Err(e) => Err(LoadError::Read { message: e.to_string() }),
    }
}
