//! # Layer Identifiers and Raw Geometry
//!
//! The decoder-facing half of the boundary: which layer a polygon belongs to
//! and the raw ring soup for each layer.

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// GDSII-style layer identifier: a (layer, datatype) pair.
///
/// Ordered so that collections keyed by `LayerId` iterate in a stable,
/// reproducible order.
///
/// # Example
///
/// ```rust
/// use layout_ir::LayerId;
///
/// let met1 = LayerId::new(2, 0);
/// assert_eq!(met1.to_string(), "2/0");
/// assert!(met1 < LayerId::new(3, 0));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LayerId {
    /// GDSII layer number.
    pub layer: u16,
    /// GDSII datatype number.
    pub datatype: u16,
}

impl LayerId {
    /// Creates a layer identifier from a layer/datatype pair.
    pub const fn new(layer: u16, datatype: u16) -> Self {
        Self { layer, datatype }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.layer, self.datatype)
    }
}

/// Raw per-layer geometry as produced by the layout decoder.
///
/// Each ring is an ordered point sequence with implicit closure (first point
/// is not repeated at the end). No winding convention is required; the
/// engine normalizes winding itself.
///
/// Backed by a `BTreeMap` so layer iteration order is ascending and
/// deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerGeometry {
    rings: BTreeMap<LayerId, Vec<Vec<DVec2>>>,
}

impl LayerGeometry {
    /// Creates an empty geometry map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one raw ring to a layer, creating the layer on first use.
    pub fn push_ring(&mut self, id: LayerId, ring: Vec<DVec2>) {
        self.rings.entry(id).or_default().push(ring);
    }

    /// Returns the raw rings of a layer, or an empty slice if absent.
    pub fn rings(&self, id: LayerId) -> &[Vec<DVec2>] {
        self.rings.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates layers in ascending identifier order.
    pub fn layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.rings.keys().copied()
    }

    /// Returns the number of layers carrying geometry.
    pub fn layer_count(&self) -> usize {
        self.rings.len()
    }

    /// Returns true if no layer carries any ring.
    pub fn is_empty(&self) -> bool {
        self.rings.values().all(Vec::is_empty)
    }
}
