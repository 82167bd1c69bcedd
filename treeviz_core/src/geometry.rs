// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-space geometry carried by scene objects.
//!
//! A [`Visual`] is what the engine interpolates. It lives in layout units, not pixels: the
//! visualization's projector maps it through the current view scales on every frame.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Point;

use crate::scale::lerp;

/// A rectangle in partition space: `x, y` origin plus `dx, dy` extent.
///
/// Treemaps read it as a rectangle, sunbursts as an angular span (`x`) and radial band (`y`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Partition {
    /// Origin along the first axis.
    pub x: f64,
    /// Origin along the second axis.
    pub y: f64,
    /// Extent along the first axis.
    pub dx: f64,
    /// Extent along the second axis.
    pub dy: f64,
}

impl Partition {
    /// Creates a partition cell.
    pub const fn new(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self { x, y, dx, dy }
    }

    /// Returns the cell centre.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.dx / 2.0, self.y + self.dy / 2.0)
    }

    /// Interpolates all four components.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
            dx: lerp(self.dx, other.dx, t),
            dy: lerp(self.dy, other.dy, t),
        }
    }
}

/// Node geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A partition cell (treemap rectangle or sunburst sector).
    Partition(Partition),
    /// A polygon in viewport coordinates (Voronoi region).
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Interpolates towards `other`.
    ///
    /// Polygons interpolate point by point only when their vertex counts match; otherwise, as
    /// with mismatched variants, the result snaps to `other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        match (self, other) {
            (Self::Partition(a), Self::Partition(b)) => Self::Partition(a.lerp(b, t)),
            (Self::Polygon(a), Self::Polygon(b)) if a.len() == b.len() => {
                Self::Polygon(a.iter().zip(b).map(|(p, q)| p.lerp(*q, t)).collect())
            }
            _ => other.clone(),
        }
    }

    /// Returns the centre of the geometry (partition centre or vertex centroid).
    pub fn center(&self) -> Point {
        match self {
            Self::Partition(p) => p.center(),
            Self::Polygon(points) => centroid(points),
        }
    }
}

/// Returns the vertex centroid of `points`, or the origin when empty.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ORIGIN;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Interpolated state of one node: geometry plus group opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    /// Node geometry in layout units.
    pub geom: Geometry,
    /// Group opacity.
    pub opacity: f64,
}

impl Visual {
    /// Creates a fully opaque visual.
    pub fn opaque(geom: Geometry) -> Self {
        Self { geom, opacity: 1.0 }
    }

    /// Returns a copy with a different opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Interpolates geometry and opacity.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            geom: self.geom.lerp(&other.geom, t),
            opacity: lerp(self.opacity, other.opacity, t),
        }
    }
}
