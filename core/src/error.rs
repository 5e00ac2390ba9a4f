//! Error kinds for the capture pipeline.
//!
//! Config and registry errors surface to the caller during startup.
//! Capture errors never leave the sample loop; they are logged and the
//! cycle is retried on the next period.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed or unloadable configuration. The caller owns recovery;
/// nothing inside the pipeline handles these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("calibration has non-positive dimensions or scale")]
    InvalidDimensions,

    #[error(
        "swatch bounding rectangle ({left},{top})..({right},{bottom}) exceeds \
         screen {width}x{height}"
    )]
    RectOutOfBounds {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        width: u32,
        height: u32,
    },

    #[error("failed to load config: {0}")]
    Load(#[from] confy::ConfyError),

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("capture backend unavailable at startup: {0}")]
    Capture(#[from] CaptureError),
}

/// Offset registry construction and lookup failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate offset name {0:?}")]
    DuplicateName(String),

    #[error("duplicate offset index {index} ({existing:?} vs {incoming:?})")]
    DuplicateIndex {
        index: usize,
        existing: String,
        incoming: String,
    },

    #[error("offset key not found: {0:?}")]
    KeyNotFound(String),
}

/// Query for a value that is not (yet) in the cache.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no captured value for key {0:?}")]
    KeyNotFound(String),
}

/// Display capture failed. Cycle-local: logged, skipped, retried.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no monitor available for capture")]
    NoMonitor,

    #[error("capture backend error: {0}")]
    Backend(String),
}

/// Diagnostic bitmap export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write bitmap {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
