//! Shared configuration types for pxwatch.
//!
//! These types are serde-friendly and carry no pipeline logic; the
//! capture/decode machinery lives in `pxwatch-core`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Empirically derived UI layout scale constant.
///
/// The monitored application lays out its UI in a virtual space whose
/// extent is `screen * ui_scale * layout_factor`. The factor is not
/// documented anywhere official; it was measured against the producing
/// application and is overridable per calibration rather than baked in.
pub const DEFAULT_LAYOUT_FACTOR: f32 = 0.533_333_3;

/// Default delay between sample cycles.
pub const DEFAULT_PERIOD_MS: u64 = 250;

/// An RGB color sampled from a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sentinel color the producer renders at the reference pixel once a
    /// frame's swatches are fully drawn. Anything else means "not ready".
    pub const CALIBRATION_MARKER: Color = Color::new(255, 217, 4);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Value encoding declared for a swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Green channel above 128 means true.
    Bool,
    /// 24-bit integer packed as (r<<16) | (g<<8) | b.
    Int,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(ValueKind::Bool),
            "int" => Ok(ValueKind::Int),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Unrecognized value-kind tag in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value kind: {:?}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

/// Screen and UI-space geometry of the reserved swatch strip.
///
/// `ref_x`/`ref_y` are the UI-space anchor of the first swatch; the
/// UI-space origin is bottom-left, so the Y axis inverts on translation
/// to display coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {
    pub screen_width: u32,
    pub screen_height: u32,
    pub ui_scale: f32,
    pub ref_x: f32,
    pub ref_y: f32,
    /// Swatch edge length in display pixels.
    pub pixel_size: u32,
    /// UI-space distance between consecutive swatch anchors.
    pub spacing: f32,
    /// See [`DEFAULT_LAYOUT_FACTOR`].
    #[serde(default = "default_layout_factor")]
    pub layout_factor: f32,
}

fn default_layout_factor() -> f32 {
    DEFAULT_LAYOUT_FACTOR
}

impl Default for CalibrationData {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            ui_scale: 1.0,
            ref_x: 0.0,
            ref_y: 288.0,
            pixel_size: 1,
            spacing: 2.0,
            layout_factor: DEFAULT_LAYOUT_FACTOR,
        }
    }
}

impl CalibrationData {
    /// Basic field sanity; bounding-rectangle checks need the offset
    /// count and live in `pxwatch-core`.
    pub fn dimensions_valid(&self) -> bool {
        self.screen_width > 0
            && self.screen_height > 0
            && self.ui_scale > 0.0
            && self.layout_factor > 0.0
            && self.pixel_size > 0
    }
}

/// Tunables for the background sample loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerSettings {
    /// Delay between sample cycles in milliseconds.
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
    /// Expected color of the reference pixel when a frame is valid.
    #[serde(default = "default_marker")]
    pub marker: Color,
}

fn default_period_ms() -> u64 {
    DEFAULT_PERIOD_MS
}

fn default_marker() -> Color {
    Color::CALIBRATION_MARKER
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            marker: Color::CALIBRATION_MARKER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calibration_toml() {
        let toml = r#"
screen_width = 2560
screen_height = 1440
ui_scale = 0.75
ref_x = 12.0
ref_y = 1398.5
pixel_size = 2
spacing = 4.0
"#;

        let calib: CalibrationData = toml::from_str(toml).unwrap();
        assert_eq!(calib.screen_width, 2560);
        assert_eq!(calib.pixel_size, 2);
        // Omitted in the TOML, filled by the serde default
        assert!((calib.layout_factor - DEFAULT_LAYOUT_FACTOR).abs() < 1e-6);
        assert!(calib.dimensions_valid());
    }

    #[test]
    fn test_parse_sampler_settings_toml() {
        let toml = r#"
period_ms = 100
marker = { r = 255, g = 217, b = 4 }
"#;

        let settings: SamplerSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.period_ms, 100);
        assert_eq!(settings.marker, Color::CALIBRATION_MARKER);
    }

    #[test]
    fn test_value_kind_from_str() {
        assert_eq!("bool".parse::<ValueKind>().unwrap(), ValueKind::Bool);
        assert_eq!("int".parse::<ValueKind>().unwrap(), ValueKind::Int);
        assert!("float".parse::<ValueKind>().is_err());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let calib = CalibrationData {
            screen_width: 0,
            ..CalibrationData::default()
        };
        assert!(!calib.dimensions_valid());
    }
}
