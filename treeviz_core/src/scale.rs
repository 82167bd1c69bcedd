// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value scales.
//!
//! Layouts produce geometry in a normalized layout space; the scales here map that space into
//! screen coordinates. Zoom transitions tween the scales themselves (see [`crate::ViewScales`]),
//! so every visible node is re-projected through the interpolated scale on each frame.

use smallvec::SmallVec;

/// A linear mapping from a numeric domain interval to a numeric range interval.
///
/// The mapping is `(x - d0) / (d1 - d0) * (r1 - r0) + r0`. It does not clamp; callers clamp
/// explicitly where a valid range matters (for example arc angles).
///
/// A zero-width domain (`d0 == d1`) is a caller error: the mapping divides by the domain width
/// and is not guarded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Default for ScaleLinear {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Replaces the domain.
    pub fn set_domain(&mut self, domain: (f64, f64)) -> &mut Self {
        self.domain = domain;
        self
    }

    /// Replaces the range.
    pub fn set_range(&mut self, range: (f64, f64)) -> &mut Self {
        self.range = range;
        self
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        (x - d0) / (d1 - d0) * (r1 - r0) + r0
    }

    /// Ratio of range length to domain length.
    pub fn factor(&self) -> f64 {
        (self.range.1 - self.range.0) / (self.domain.1 - self.domain.0)
    }

    /// Interpolates both domain and range towards `other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            domain: (
                lerp(self.domain.0, other.domain.0, t),
                lerp(self.domain.1, other.domain.1, t),
            ),
            range: (
                lerp(self.range.0, other.range.0, t),
                lerp(self.range.1, other.range.1, t),
            ),
        }
    }
}

/// Stop list storage for [`ScaleStops`].
pub type Stops = SmallVec<[f64; 4]>;

/// A piecewise-linear ("polylinear") scale over matching domain and range stops.
///
/// With two stops on each side this is the same mapping as [`ScaleLinear`]. When the stop lists
/// differ in length only the first `min(domain.len(), range.len())` stops take part, and values
/// outside the domain extrapolate along the first or last segment.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleStops {
    /// Domain stops, ascending.
    pub domain: Stops,
    /// Range stops, aligned with `domain`.
    pub range: Stops,
}

impl Default for ScaleStops {
    fn default() -> Self {
        Self::linear((0.0, 1.0), (0.0, 1.0))
    }
}

impl ScaleStops {
    /// Creates a scale from explicit stop lists.
    pub fn new(domain: impl IntoIterator<Item = f64>, range: impl IntoIterator<Item = f64>) -> Self {
        Self {
            domain: domain.into_iter().collect(),
            range: range.into_iter().collect(),
        }
    }

    /// Creates a two-stop scale.
    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::new([domain.0, domain.1], [range.0, range.1])
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match segment(&self.domain, self.range.len(), x) {
            Segment::Empty => 0.0,
            Segment::Constant => self.range[0],
            Segment::Between { index, t } => lerp(self.range[index], self.range[index + 1], t),
        }
    }

    /// Interpolates towards `other`, stop by stop.
    ///
    /// See [`lerp_stops`] for how lists of different lengths are handled.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            domain: lerp_stops(&self.domain, &other.domain, t),
            range: lerp_stops(&self.range, &other.range, t),
        }
    }
}

/// Interpolates two stop lists element-wise.
///
/// The common prefix is interpolated; the tail of the longer list is copied as-is. When a banded
/// domain and range change length across a zoom, the copied tail pairs stale stops with fresh
/// ones until the transition ends. Banded sunburst zooms depend on exactly this behaviour.
pub fn lerp_stops(a: &[f64], b: &[f64], t: f64) -> Stops {
    let common = a.len().min(b.len());
    let mut out: Stops = a
        .iter()
        .zip(b)
        .map(|(&from, &to)| lerp(from, to, t))
        .collect();
    if a.len() > common {
        out.extend_from_slice(&a[common..]);
    } else if b.len() > common {
        out.extend_from_slice(&b[common..]);
    }
    out
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Where a value falls within a stop list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Segment {
    /// No stops.
    Empty,
    /// A single usable stop.
    Constant,
    /// Between stops `index` and `index + 1`, at parameter `t` (may lie outside `0..=1`).
    Between { index: usize, t: f64 },
}

/// Locates `x` in the first `min(domain.len(), range_len)` stops of `domain`.
pub(crate) fn segment(domain: &[f64], range_len: usize, x: f64) -> Segment {
    let n = domain.len().min(range_len);
    match n {
        0 => Segment::Empty,
        1 => Segment::Constant,
        _ => {
            // Upper-bound bisect over the interior stops.
            let mut lo = 1;
            let mut hi = n - 1;
            while lo < hi {
                let mid = (lo + hi) / 2;
                if x < domain[mid] {
                    hi = mid;
                } else {
                    lo = mid + 1;
                }
            }
            let index = lo - 1;
            let d0 = domain[index];
            let d1 = domain[index + 1];
            Segment::Between {
                index,
                t: (x - d0) / (d1 - d0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn linear_maps_domain_onto_range() {
        let s = ScaleLinear::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(s.map(0.0), 100.0);
        assert_eq!(s.map(5.0), 150.0);
        assert_eq!(s.map(10.0), 200.0);
        // No clamping.
        assert_eq!(s.map(20.0), 300.0);
    }

    #[test]
    fn linear_setters_replace_intervals() {
        let mut s = ScaleLinear::default();
        s.set_domain((0.25, 0.5)).set_range((0.0, 400.0));
        assert_eq!(s.map(0.25), 0.0);
        assert_eq!(s.map(0.5), 400.0);
        assert_eq!(s.factor(), 1600.0);
    }

    #[test]
    fn stops_with_two_entries_match_linear() {
        let a = ScaleLinear::new((1.0, 3.0), (-1.0, 1.0));
        let b = ScaleStops::linear((1.0, 3.0), (-1.0, 1.0));
        for x in [0.0, 1.0, 1.5, 2.0, 3.0, 4.0] {
            assert!((a.map(x) - b.map(x)).abs() < 1e-12, "x = {x}");
        }
    }

    #[test]
    fn stops_map_piecewise_and_extrapolate() {
        let s = ScaleStops::new([0.0, 0.5, 1.0], [0.0, 10.0, 100.0]);
        assert_eq!(s.map(0.25), 5.0);
        assert_eq!(s.map(0.75), 55.0);
        assert_eq!(s.map(-0.5), -10.0);
        assert_eq!(s.map(1.5), 190.0);
    }

    #[test]
    fn stops_use_shortest_list() {
        let s = ScaleStops::new([0.0, 1.0, 2.0], [0.0, 10.0]);
        assert_eq!(s.map(2.0), 20.0);
        let single = ScaleStops::new([3.0], [7.0, 8.0]);
        assert_eq!(single.map(100.0), 7.0);
    }

    #[test]
    fn lerp_stops_keeps_longer_tail() {
        let out = lerp_stops(&[0.0, 10.0], &[10.0, 20.0, 30.0], 0.5);
        assert_eq!(out.as_slice(), &[5.0, 15.0, 30.0]);
        let out = lerp_stops(&[0.0, 10.0, 99.0], &[10.0, 20.0], 0.5);
        assert_eq!(out.as_slice(), &[5.0, 15.0, 99.0]);
    }
}
