// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for node shapes.
//!
//! Each tree depth owns a band of z-indexes so deeper nodes draw above shallower ones, which a
//! treemap needs for children to cover their parent. Renderers sort by `(z_index, order)` for a
//! deterministic tie-break.

/// Distance between the bands of consecutive depths.
pub const DEPTH_STRIDE: i32 = 10;

/// Body shapes within a depth band.
pub const BODY: i32 = 0;
/// Label shapes within a depth band, above bodies.
pub const LABEL: i32 = 1;

/// Returns the z-index of a node group at `depth`.
pub fn node(depth: usize) -> i32 {
    i32::try_from(depth)
        .unwrap_or(i32::MAX / DEPTH_STRIDE)
        .saturating_mul(DEPTH_STRIDE)
}

/// Returns the z-index of a node's body at `depth`.
pub fn body(depth: usize) -> i32 {
    node(depth).saturating_add(BODY)
}

/// Returns the z-index of a node's label at `depth`.
pub fn label(depth: usize) -> i32 {
    node(depth).saturating_add(LABEL)
}
