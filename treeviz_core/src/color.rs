// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colour helpers.
//!
//! Shape fill and shape opacity are separate renderable properties, so colours that carry an
//! alpha channel are split into an opaque [`Paint::color`] and a [`Paint::opacity`] factor
//! before they are interpolated.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use peniko::Color;
use peniko::color::{Srgb, parse_color};

use crate::scale::{Segment, lerp, segment};

/// An opaque colour plus a separate opacity factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Colour with alpha forced to 1.
    pub color: Color,
    /// Opacity in `0..=1`.
    pub opacity: f64,
}

impl Paint {
    /// Splits a colour into its opaque part and alpha.
    pub fn from_color(color: Color) -> Self {
        let [r, g, b, a] = color.components;
        Self {
            color: Color::new([r, g, b, 1.0]),
            opacity: f64::from(a),
        }
    }

    /// Creates a paint with an explicit opacity.
    pub fn new(color: Color, opacity: f64) -> Self {
        Self {
            color: Self::from_color(color).color,
            opacity,
        }
    }

    /// Returns a copy with the opacity multiplied by `factor`.
    #[must_use]
    pub fn fade(self, factor: f64) -> Self {
        Self {
            color: self.color,
            opacity: self.opacity * factor,
        }
    }

    /// Interpolates colour channels and opacity independently.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            color: lerp_color(self.color, other.color, t),
            opacity: lerp(self.opacity, other.opacity, t),
        }
    }
}

/// Parses a CSS colour string (`#rgb`, `#rrggbb`, `rgb()`, `rgba()`, `hsl()`, named colours).
pub fn parse_css(text: &str) -> Option<Color> {
    parse_color(text.trim())
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

/// Interpolates two colours channel by channel in sRGB (alpha included).
pub fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let t = t as f32;
    let mut out = [0.0_f32; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        let from = a.components[i];
        *slot = from + (b.components[i] - from) * t;
    }
    Color::new(out)
}

/// Formats the opaque part of a colour as `#rrggbb`.
pub fn to_hex(color: Color) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(7);
    out.push('#');
    for c in &color.components[..3] {
        let v = channel_u8(*c);
        out.push(char::from(DIGITS[usize::from(v >> 4)]));
        out.push(char::from(DIGITS[usize::from(v & 0xf)]));
    }
    out
}

fn channel_u8(c: f32) -> u8 {
    let scaled = c.clamp(0.0, 1.0) * 255.0 + 0.5;
    // Clamped to 0..=255.5, so truncation is the intended rounding.
    #[allow(clippy::cast_possible_truncation, reason = "value is clamped to u8 range")]
    let v = scaled as u8;
    v
}

/// A piecewise colour scale: numeric stops mapped onto a palette.
///
/// Interpolation happens in sRGB and extrapolated channels are clamped, so values outside the
/// domain saturate instead of producing invalid colours.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    domain: Vec<f64>,
    palette: Vec<Color>,
}

impl ColorRamp {
    /// Creates a ramp from explicit domain stops and palette colours.
    pub fn new(domain: Vec<f64>, palette: Vec<Color>) -> Self {
        Self { domain, palette }
    }

    /// Creates a ramp whose domain runs evenly from `min` to `max` across the palette stops.
    ///
    /// The domain has one stop per palette entry, at least two.
    pub fn stepped(min: f64, max: f64, palette: Vec<Color>) -> Self {
        let steps = palette.len().saturating_sub(1).max(1);
        let step = (max - min) / steps as f64;
        let domain = (0..=steps).map(|i| min + step * i as f64).collect();
        Self { domain, palette }
    }

    /// Returns the domain stops.
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// Returns the palette.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Maps a value to a colour.
    pub fn map(&self, x: f64) -> Color {
        match segment(&self.domain, self.palette.len(), x) {
            Segment::Empty => Color::BLACK,
            Segment::Constant => self.palette[0],
            Segment::Between { index, t } => {
                let c = lerp_color(self.palette[index], self.palette[index + 1], t);
                let [r, g, b, a] = c.components;
                Color::new([
                    r.clamp(0.0, 1.0),
                    g.clamp(0.0, 1.0),
                    b.clamp(0.0, 1.0),
                    a.clamp(0.0, 1.0),
                ])
            }
        }
    }
}
