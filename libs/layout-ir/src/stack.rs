//! # Layer Stack
//!
//! Vertical placement and material of each layer, as produced by the
//! layer-stack loader collaborator.
//!
//! A stack entry carries the z-base and thickness of the slab a layer
//! extrudes into, plus an opaque material for the exporter. Cut ("via")
//! layers may instead reference the routing layers they connect; their
//! placement is derived from those references before validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layer::LayerId;

/// Material attached to every triangle generated from a layer.
///
/// The engine treats this as an opaque tag; only the exporter interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Human-readable material or texture name.
    pub name: String,
    /// Display color, RGBA with 8 bits per channel.
    pub rgba: [u8; 4],
}

impl Material {
    /// Creates a material from a name and RGBA color.
    pub fn new(name: impl Into<String>, rgba: [u8; 4]) -> Self {
        Self {
            name: name.into(),
            rgba,
        }
    }

    /// Returns the opaque RGB channels.
    pub fn rgb(&self) -> [u8; 3] {
        [self.rgba[0], self.rgba[1], self.rgba[2]]
    }

    /// Returns the color as `#rrggbb`.
    pub fn hex(&self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Returns the color as `#rrggbbaa`.
    pub fn hexa(&self) -> String {
        let [r, g, b, a] = self.rgba;
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Fabrication role of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Metal or polysilicon routing layer with explicit placement.
    Routing,
    /// Via/contact layer whose placement is derived from the layers it
    /// connects.
    Cut,
    /// Any other layer (implant, marker) with explicit placement.
    Other,
}

/// Routing layers a cut layer connects, referenced by stack entry name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaConnection {
    /// Name of the routing layer above the cut.
    pub top: String,
    /// Name of the routing layer below the cut.
    pub bot: String,
}

/// One layer's vertical placement and material.
///
/// For entries with `connects` set, `z_base` and `thickness` are
/// placeholders until [`LayerStack::resolve_vias`] derives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStackEntry {
    /// Stack-file name of the layer (e.g. `"met1"`).
    pub name: String,
    /// Fabrication role.
    pub kind: LayerKind,
    /// Bottom of the slab in z.
    pub z_base: f64,
    /// Slab height, must be positive once resolved.
    pub thickness: f64,
    /// Material tag inherited by every triangle of this layer.
    pub material: Material,
    /// Present on cut layers whose placement is derived.
    pub connects: Option<ViaConnection>,
}

/// Error raised by stack resolution or validation.
///
/// All variants are fatal: a malformed stack aborts the conversion before
/// any geometry work begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StackError {
    /// Thickness is zero or negative after via resolution.
    #[error("layer {layer}: thickness must be positive, got {thickness}")]
    NonPositiveThickness { layer: LayerId, thickness: f64 },

    /// A placement field is NaN or infinite.
    #[error("layer {layer}: {field} must be finite, got {value}")]
    NonFiniteDimension {
        layer: LayerId,
        field: &'static str,
        value: f64,
    },

    /// A cut layer references a stack entry name that does not exist.
    #[error("via layer {layer}: unknown reference layer {reference:?}")]
    UnknownViaReference { layer: LayerId, reference: String },
}

/// The complete layer stack, keyed by layer identifier.
///
/// Backed by a `BTreeMap` for deterministic ascending iteration. Inserting
/// a duplicate identifier replaces the previous entry (last-write-wins,
/// matching how stack files override earlier definitions).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerStack {
    entries: BTreeMap<LayerId, LayerStackEntry>,
}

impl LayerStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any previous entry for the same id.
    pub fn insert(&mut self, id: LayerId, entry: LayerStackEntry) -> Option<LayerStackEntry> {
        self.entries.insert(id, entry)
    }

    /// Looks up the entry for a layer.
    pub fn get(&self, id: LayerId) -> Option<&LayerStackEntry> {
        self.entries.get(&id)
    }

    /// Iterates entries in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &LayerStackEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the stack has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derives the placement of cut layers from the layers they connect.
    ///
    /// A cut spans from the top of its `bot` layer to the bottom of its
    /// `top` layer:
    ///
    /// ```text
    /// cut.z_base    = bot.z_base + bot.thickness
    /// cut.thickness = top.z_base - cut.z_base
    /// ```
    ///
    /// References are resolved by entry name. Must be called before
    /// [`validate`](Self::validate) when the stack contains cut layers.
    pub fn resolve_vias(&mut self) -> Result<(), StackError> {
        let mut derived: Vec<(LayerId, f64, f64)> = Vec::new();

        for (id, entry) in &self.entries {
            let Some(connection) = &entry.connects else {
                continue;
            };
            let bot = self.find_by_name(&connection.bot).ok_or_else(|| {
                StackError::UnknownViaReference {
                    layer: *id,
                    reference: connection.bot.clone(),
                }
            })?;
            let top = self.find_by_name(&connection.top).ok_or_else(|| {
                StackError::UnknownViaReference {
                    layer: *id,
                    reference: connection.top.clone(),
                }
            })?;

            let z_base = bot.z_base + bot.thickness;
            let thickness = top.z_base - z_base;
            derived.push((*id, z_base, thickness));
        }

        for (id, z_base, thickness) in derived {
            let entry = self.entries.get_mut(&id).expect("entry existed above");
            entry.z_base = z_base;
            entry.thickness = thickness;
        }
        Ok(())
    }

    /// Checks every entry for a finite placement and positive thickness.
    ///
    /// Returns the first offending layer. Call after
    /// [`resolve_vias`](Self::resolve_vias).
    pub fn validate(&self) -> Result<(), StackError> {
        for (id, entry) in &self.entries {
            if !entry.z_base.is_finite() {
                return Err(StackError::NonFiniteDimension {
                    layer: *id,
                    field: "z_base",
                    value: entry.z_base,
                });
            }
            if !entry.thickness.is_finite() {
                return Err(StackError::NonFiniteDimension {
                    layer: *id,
                    field: "thickness",
                    value: entry.thickness,
                });
            }
            if entry.thickness <= 0.0 {
                return Err(StackError::NonPositiveThickness {
                    layer: *id,
                    thickness: entry.thickness,
                });
            }
        }
        Ok(())
    }

    fn find_by_name(&self, name: &str) -> Option<&LayerStackEntry> {
        self.entries.values().find(|entry| entry.name == name)
    }
}
