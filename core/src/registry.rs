//! Offset registry: the symbolic map from value name to swatch slot.
//!
//! An "offset" plays the role a memory offset would in a conventional
//! introspection tool, but resolves to a screen location and a color
//! encoding instead of an address. The registry is built once from a
//! declarative table before the sampler is constructed and is read-only
//! afterwards; collisions fail loudly at build time.

use crate::error::RegistryError;
use crate::translate::ui_to_monitor;
use hashbrown::HashMap;
use pxwatch_types::{CalibrationData, ValueKind};

/// One row of the declarative offset table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetDef {
    pub name: String,
    pub kind: ValueKind,
    pub index: usize,
}

impl OffsetDef {
    pub fn new(name: impl Into<String>, kind: ValueKind, index: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            index,
        }
    }
}

/// Slot assignment for a registered offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetMetadata {
    /// 0-based ordinal within the swatch strip, unique per registry.
    pub index: usize,
    pub kind: ValueKind,
}

/// Name -> metadata map, immutable after `build`.
#[derive(Debug, Clone, Default)]
pub struct OffsetRegistry {
    offsets: HashMap<String, OffsetMetadata>,
}

impl OffsetRegistry {
    /// Build from a declarative table. Duplicate names and duplicate
    /// indices are both rejected rather than silently overwritten.
    pub fn build(defs: &[OffsetDef]) -> Result<Self, RegistryError> {
        let mut offsets: HashMap<String, OffsetMetadata> = HashMap::with_capacity(defs.len());
        let mut by_index: HashMap<usize, &str> = HashMap::with_capacity(defs.len());

        for def in defs {
            if offsets.contains_key(&def.name) {
                return Err(RegistryError::DuplicateName(def.name.clone()));
            }
            if let Some(existing) = by_index.get(&def.index) {
                return Err(RegistryError::DuplicateIndex {
                    index: def.index,
                    existing: (*existing).to_string(),
                    incoming: def.name.clone(),
                });
            }
            by_index.insert(def.index, &def.name);
            offsets.insert(
                def.name.clone(),
                OffsetMetadata {
                    index: def.index,
                    kind: def.kind,
                },
            );
        }

        Ok(Self { offsets })
    }

    pub fn lookup(&self, name: &str) -> Result<&OffsetMetadata, RegistryError> {
        self.offsets
            .get(name)
            .ok_or_else(|| RegistryError::KeyNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OffsetMetadata)> {
        self.offsets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.offsets.keys().map(String::as_str)
    }

    /// Number of registered offsets; sizes the bounding rectangle.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// UI-space anchor of a swatch, one `spacing` column per ordinal.
///
/// The producer draws swatch `index` one column to the right of the
/// previous one, inset by the swatch edge length.
pub fn swatch_ui_anchor(index: usize, calib: &CalibrationData) -> (f32, f32) {
    let column = (index + 1) as f32;
    let ui_x = calib.ref_x + column * calib.spacing - calib.pixel_size as f32;
    let ui_y = calib.ref_y - calib.pixel_size as f32;
    (ui_x, ui_y)
}

/// X offset of a swatch inside an already-captured frame.
///
/// Only the horizontal component matters: the strip is a single row, so
/// every swatch sits on row 0 of the captured rectangle (no further
/// display I/O is needed once the frame is in memory). The captured
/// frame already starts at the translated `ref_x`, so the anchor is
/// taken relative to it.
pub fn swatch_column(index: usize, calib: &CalibrationData) -> i32 {
    let (anchor_x, _) = swatch_ui_anchor(index, calib);
    let (x, _) = ui_to_monitor(anchor_x - calib.ref_x, 0.0, calib);
    x
}
