// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks.
//!
//! Labels are never truncated or resized: they are hidden once their container becomes too
//! small. Deciding that needs the rendered extent of each label, which the scene asks for
//! through [`TextMeasurer`] when a text shape is created.

extern crate alloc;

use alloc::sync::Arc;

/// Text styling inputs relevant to measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in scene units (typically pixels).
    pub font_size: f64,
    /// Font family name.
    pub font_family: Arc<str>,
}

impl TextStyle {
    /// Creates a style with the given size and family.
    pub fn new(font_size: f64, font_family: impl Into<Arc<str>>) -> Self {
        Self {
            font_size,
            font_family: font_family.into(),
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(11.0, "Times New Roman")
    }
}

/// A minimal text measurement interface.
///
/// Implementations can be heuristic or backed by a real shaping engine owned by the host.
pub trait TextMeasurer {
    /// Returns `(width, height)` of a single line of text.
    fn measure(&self, text: &str, style: &TextStyle) -> (f64, f64);
}

/// A tiny heuristic text measurer suitable for tests and headless rendering.
///
/// It assumes an average glyph width of ~0.6em and a line height of 1.2em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> (f64, f64) {
        let width = 0.6 * style.font_size * text.chars().count() as f64;
        (width, 1.2 * style.font_size)
    }
}
