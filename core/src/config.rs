//! Application configuration.
//!
//! One TOML document (confy-managed) carries the calibration record, the
//! sampler settings, and the declarative offset table that seeds the
//! registry. The table replaces per-symbol registration code: a startup
//! loop consumes it strictly before the sampler is constructed.

use crate::error::ConfigError;
use crate::registry::{OffsetDef, OffsetRegistry};
use crate::sampler::validate_calibration;
use pxwatch_types::{CalibrationData, SamplerSettings, ValueKind};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "pxwatch";

/// One `[[offset]]` table entry.
///
/// The kind is kept as a raw string here so an unrecognized tag degrades
/// instead of failing the whole config load: it is logged and the entry
/// falls back to `bool`, decoding to that kind's zero default until the
/// config is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetEntry {
    pub name: String,
    pub kind: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub calibration: CalibrationData,
    #[serde(default)]
    pub sampler: SamplerSettings,
    #[serde(default, rename = "offset")]
    pub offsets: Vec<OffsetEntry>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    pub fn store(&self) -> Result<(), ConfigError> {
        Ok(confy::store(APP_NAME, None, self)?)
    }

    /// Lower the table into registry definitions.
    pub fn offset_defs(&self) -> Vec<OffsetDef> {
        self.offsets
            .iter()
            .map(|entry| {
                let kind = entry.kind.parse::<ValueKind>().unwrap_or_else(|e| {
                    tracing::warn!(
                        "[CONFIG] offset {:?}: {e}, defaulting to bool",
                        entry.name
                    );
                    ValueKind::Bool
                });
                OffsetDef::new(entry.name.clone(), kind, entry.index)
            })
            .collect()
    }

    /// Build and validate everything the sampler needs.
    ///
    /// Registry collisions and out-of-bounds calibrations both fail
    /// loudly here, before any thread is spawned.
    pub fn build_registry(&self) -> Result<OffsetRegistry, ConfigError> {
        let registry = OffsetRegistry::build(&self.offset_defs())?;
        validate_calibration(&self.calibration, registry.len())?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[calibration]
screen_width = 1920
screen_height = 1080
ui_scale = 1.0
ref_x = 0.0
ref_y = 270.0
pixel_size = 1
spacing = 2.0
layout_factor = 0.5

[sampler]
period_ms = 100

[[offset]]
name = "player_alive"
kind = "bool"
index = 0

[[offset]]
name = "target_health"
kind = "int"
index = 1
"#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.offsets.len(), 2);
        assert_eq!(config.sampler.period_ms, 100);

        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("target_health").unwrap().kind, ValueKind::Int);
    }

    #[test]
    fn test_unknown_kind_defaults_to_bool() {
        let config = AppConfig {
            offsets: vec![OffsetEntry {
                name: "mystery".to_string(),
                kind: "float".to_string(),
                index: 0,
            }],
            ..AppConfig::default()
        };

        let defs = config.offset_defs();
        assert_eq!(defs[0].kind, ValueKind::Bool);
    }

    #[test]
    fn test_duplicate_offsets_fail_build() {
        let entry = OffsetEntry {
            name: "dup".to_string(),
            kind: "int".to_string(),
            index: 0,
        };
        let config = AppConfig {
            offsets: vec![entry.clone(), entry],
            ..AppConfig::default()
        };

        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Registry(_))
        ));
    }
}
