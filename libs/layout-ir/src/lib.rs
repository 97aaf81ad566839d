//! # Layout IR
//!
//! Boundary types for the layout extrusion pipeline.
//!
//! ## Architecture
//!
//! ```text
//! layout decoder ──▶ LayerGeometry ─┐
//!                                   ├──▶ layout-mesh (Mesh)
//! stack loader ────▶ LayerStack ────┘
//! ```
//!
//! The decoder and the stack loader are external collaborators; this crate
//! defines exactly what they hand to the engine. Geometry arrives as raw
//! rings (closed implicitly, arbitrary winding) keyed by [`LayerId`]; the
//! vertical placement and material of each layer arrive as a [`LayerStack`].
//!
//! Layer stacks are validated before any geometry work: a non-positive
//! thickness is a configuration error that aborts the whole conversion,
//! while a layer present in geometry but absent from the stack is merely
//! skipped downstream.

pub mod layer;
pub mod stack;

pub use layer::{LayerGeometry, LayerId};
pub use stack::{LayerKind, LayerStack, LayerStackEntry, Material, StackError, ViaConnection};
