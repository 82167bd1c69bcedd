// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host binding options.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;
use serde_json::Value;
use peniko::Color;
use treeviz_core::{Paint, TextStyle, parse_css};
use treeviz_hierarchy::{HierarchyConfig, SortBy};

/// The visualizations a host can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualizationKind {
    /// Squarified treemap.
    Treemap,
    /// Radial partition.
    Sunburst,
    /// Precomputed Voronoi regions.
    Voronoi,
}

impl VisualizationKind {
    /// Looks up a visualization by its option name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "treemap" => Some(Self::Treemap),
            "sunburst" => Some(Self::Sunburst),
            "voronoi" => Some(Self::Voronoi),
            _ => None,
        }
    }

    /// Returns the option name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Treemap => "treemap",
            Self::Sunburst => "sunburst",
            Self::Voronoi => "voronoi",
        }
    }
}

/// Everything a [`VisualizationHost`](crate::VisualizationHost) is configured with.
///
/// Deserializes from the camelCase option names of the data-binding surface; the
/// normalizer's options (`childrenPath`, `areaPath`, `colorPath`, `colorPalette`, `levels`, …)
/// sit at the same level.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualizationOptions {
    /// Visualization type name; unknown names get a blank visualization.
    pub visualization: String,
    /// Raw hierarchical data.
    pub data: Value,
    /// Field names and palettes for normalization.
    #[serde(flatten)]
    pub hierarchy: HierarchyConfig,
    /// Initial selection path.
    pub selected_item_path: Option<Vec<usize>>,
    /// Initial zoom path.
    pub zoomed_item_path: Vec<usize>,
    /// Depth limit below the focal path; `None` shows every level.
    pub max_visible_levels: Option<usize>,
    /// Whether two-finger twisting rotates.
    pub enable_rotate: bool,
    /// Whether pinching scales.
    pub enable_zoom: bool,
    /// Whether touch gestures are handled.
    pub enable_touch: bool,
    /// Show labels even when they do not fit.
    pub allow_text_overflow: bool,
    /// Transition duration in milliseconds.
    pub duration: f64,
    /// Treemap sibling padding and border inset.
    pub spacing: f64,
    /// Sunburst per-level radius fractions.
    pub levels_fr: Option<Vec<f64>>,
    /// Sunburst fraction for levels missing from `levels_fr`.
    pub fr: f64,
    /// Sunburst fraction for the focal node's parent band.
    pub parent_fr: f64,
    /// Rotate sunburst labels along their arc.
    pub enable_rotated_text: bool,
    /// Sunburst sibling order.
    pub sort_by: SortBy,
    /// Label font size.
    pub font_size: f64,
    /// Label font family.
    pub font_family: String,
    /// Label colour as a CSS colour string.
    pub font_color: String,
}

impl Default for VisualizationOptions {
    fn default() -> Self {
        Self {
            visualization: String::new(),
            data: serde_json::json!({ "name": "Empty" }),
            hierarchy: HierarchyConfig::default(),
            selected_item_path: None,
            zoomed_item_path: Vec::new(),
            max_visible_levels: None,
            enable_rotate: false,
            enable_zoom: false,
            enable_touch: false,
            allow_text_overflow: false,
            duration: 1000.0,
            spacing: 3.0,
            levels_fr: None,
            fr: 1.0,
            parent_fr: 1.0,
            enable_rotated_text: true,
            sort_by: SortBy::Value,
            font_size: 11.0,
            font_family: "Times New Roman".into(),
            font_color: "black".into(),
        }
    }
}

impl VisualizationOptions {
    /// Creates default options for the named visualization.
    pub fn new(visualization: impl Into<String>) -> Self {
        Self {
            visualization: visualization.into(),
            ..Self::default()
        }
    }

    /// Sets the raw data.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Sets the normalizer configuration.
    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: HierarchyConfig) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Sets the initial zoom path.
    #[must_use]
    pub fn with_zoomed_item_path(mut self, path: Vec<usize>) -> Self {
        self.zoomed_item_path = path;
        self
    }

    /// Sets the initial selection path.
    #[must_use]
    pub fn with_selected_item_path(mut self, path: Option<Vec<usize>>) -> Self {
        self.selected_item_path = path;
        self
    }

    /// Sets the visible-depth limit.
    #[must_use]
    pub fn with_max_visible_levels(mut self, levels: Option<usize>) -> Self {
        self.max_visible_levels = levels;
        self
    }

    /// Enables touch handling, optionally with pinch zoom and rotation.
    #[must_use]
    pub fn with_gestures(mut self, touch: bool, zoom: bool, rotate: bool) -> Self {
        self.enable_touch = touch;
        self.enable_zoom = zoom;
        self.enable_rotate = rotate;
        self
    }

    /// Shows labels regardless of fit.
    #[must_use]
    pub fn with_text_overflow(mut self, allow: bool) -> Self {
        self.allow_text_overflow = allow;
        self
    }

    /// Sets the transition duration in milliseconds.
    #[must_use]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the treemap spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Enables banded sunburst radii.
    #[must_use]
    pub fn with_levels_fr(mut self, levels_fr: Vec<f64>, fr: f64, parent_fr: f64) -> Self {
        self.levels_fr = Some(levels_fr);
        self.fr = fr;
        self.parent_fr = parent_fr;
        self
    }

    /// Sets whether sunburst labels follow their arc.
    #[must_use]
    pub fn with_rotated_text(mut self, enabled: bool) -> Self {
        self.enable_rotated_text = enabled;
        self
    }

    /// Sets the sunburst sibling order.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Sets the label font.
    #[must_use]
    pub fn with_font(mut self, size: f64, family: impl Into<String>) -> Self {
        self.font_size = size;
        self.font_family = family.into();
        self
    }

    /// Sets the label colour.
    #[must_use]
    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }

    /// Returns the configured visualization, if the name is known.
    pub fn kind(&self) -> Option<VisualizationKind> {
        VisualizationKind::from_name(&self.visualization)
    }

    /// Returns the label text style.
    pub fn text_style(&self) -> TextStyle {
        TextStyle::new(self.font_size, self.font_family.as_str())
    }

    /// Returns the label paint. Unparseable colours fall back to black.
    pub fn label_paint(&self) -> Paint {
        let color = parse_css(&self.font_color).unwrap_or_else(|| {
            tracing::warn!(color = %self.font_color, "invalid font colour, using black");
            Color::BLACK
        });
        Paint::from_color(color)
    }
}
