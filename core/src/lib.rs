//! pxwatch-core: reader side of a pixel-color side channel.
//!
//! The monitored application renders single-pixel swatches whose colors
//! encode named values. This crate captures the reserved region on a
//! fixed period, validates the calibration marker, decodes each swatch,
//! and publishes the results into a queryable cache.

pub mod app_state;
pub mod cache;
pub mod capture;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod registry;
pub mod sampler;
pub mod translate;

// Re-exports for convenience
pub use app_state::AppState;
pub use cache::ValueCache;
pub use capture::{Frame, FrameSource, ScreenRect, XcapSource};
pub use decode::decode;
pub use error::{CaptureError, ConfigError, ExportError, QueryError, RegistryError};
pub use registry::{OffsetDef, OffsetMetadata, OffsetRegistry, swatch_column, swatch_ui_anchor};
pub use sampler::{Sampler, bounding_rect, validate_calibration};
pub use translate::{monitor_to_ui, ui_to_monitor};
