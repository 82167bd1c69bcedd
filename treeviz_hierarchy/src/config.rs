// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field-name and palette configuration for the normalizer.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Size;
use peniko::Color;
use serde::Deserialize;
use treeviz_core::parse_css;

use crate::palette::{DEFAULT_PALETTE, default_palette, named_palette};

/// A palette: either a ColorBrewer name or an explicit list of CSS colours.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    /// A named palette such as `"PuBu"`.
    Named(String),
    /// Explicit CSS colours.
    Colors(Vec<String>),
}

impl Default for PaletteSpec {
    fn default() -> Self {
        Self::Named(DEFAULT_PALETTE.into())
    }
}

impl PaletteSpec {
    /// Resolves the palette to colours.
    ///
    /// Returns `None` for unknown names and for lists with no parseable colour.
    pub fn resolve(&self) -> Option<Vec<Color>> {
        match self {
            Self::Named(name) => named_palette(name),
            Self::Colors(colors) => {
                let parsed: Vec<Color> = colors
                    .iter()
                    .filter_map(|c| {
                        let color = parse_css(c);
                        if color.is_none() {
                            tracing::warn!(color = %c, "ignoring unparseable palette colour");
                        }
                        color
                    })
                    .collect();
                (!parsed.is_empty()).then_some(parsed)
            }
        }
    }
}

/// Per-level overrides. Unset fields fall back to the global options.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelFields {
    /// Children field name.
    pub children_path: Option<String>,
    /// Size field name.
    pub area_path: Option<String>,
    /// Colour value field name.
    pub color_path: Option<String>,
    /// Palette for nodes at this level.
    pub color_palette: Option<PaletteSpec>,
}

/// One entry of [`HierarchyConfig::levels`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    /// Only the children field name; everything else is global.
    ChildrenPath(String),
    /// Individual overrides.
    Fields(LevelFields),
}

/// Fully resolved settings for one tree depth.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLevel {
    /// Children field name.
    pub children_path: String,
    /// Size field name.
    pub area_path: String,
    /// Colour value field name.
    pub color_path: String,
    /// Palette colours.
    pub palette: Vec<Color>,
}

/// Configuration of the tree normalizer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HierarchyConfig {
    /// Default children field name.
    pub children_path: String,
    /// Default size field name.
    pub area_path: String,
    /// Default colour value field name.
    pub color_path: String,
    /// Default palette.
    pub color_palette: PaletteSpec,
    /// Per-depth overrides; depth `i` uses `levels[i]`, deeper nodes use the defaults.
    pub levels: Vec<LevelSpec>,
    /// Field holding precomputed Voronoi region points.
    pub region_path: String,
    /// Coordinate space the region points are expressed in.
    pub region_space: Size,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            children_path: "children".into(),
            area_path: "area".into(),
            color_path: "color".into(),
            color_palette: PaletteSpec::default(),
            levels: Vec::new(),
            region_path: "coords".into(),
            region_space: Size::new(600.0, 600.0),
        }
    }
}

impl HierarchyConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default children field name.
    #[must_use]
    pub fn with_children_path(mut self, path: impl Into<String>) -> Self {
        self.children_path = path.into();
        self
    }

    /// Sets the default size field name.
    #[must_use]
    pub fn with_area_path(mut self, path: impl Into<String>) -> Self {
        self.area_path = path.into();
        self
    }

    /// Sets the default colour value field name.
    #[must_use]
    pub fn with_color_path(mut self, path: impl Into<String>) -> Self {
        self.color_path = path.into();
        self
    }

    /// Sets the default palette.
    #[must_use]
    pub fn with_color_palette(mut self, palette: PaletteSpec) -> Self {
        self.color_palette = palette;
        self
    }

    /// Sets the per-depth overrides.
    #[must_use]
    pub fn with_levels(mut self, levels: Vec<LevelSpec>) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the Voronoi region field name.
    #[must_use]
    pub fn with_region_path(mut self, path: impl Into<String>) -> Self {
        self.region_path = path.into();
        self
    }

    /// Sets the Voronoi region coordinate space.
    #[must_use]
    pub fn with_region_space(mut self, space: Size) -> Self {
        self.region_space = space;
        self
    }

    /// Resolves the global defaults.
    ///
    /// An unknown palette falls back to the default palette.
    pub fn global_level(&self) -> ResolvedLevel {
        let palette = self.color_palette.resolve().unwrap_or_else(|| {
            tracing::warn!(palette = ?self.color_palette, "unknown palette, using default");
            default_palette()
        });
        ResolvedLevel {
            children_path: self.children_path.clone(),
            area_path: self.area_path.clone(),
            color_path: self.color_path.clone(),
            palette,
        }
    }

    /// Resolves every configured level against the global defaults.
    pub fn resolved_levels(&self) -> (Vec<ResolvedLevel>, ResolvedLevel) {
        let global = self.global_level();
        let levels = self
            .levels
            .iter()
            .map(|level| match level {
                LevelSpec::ChildrenPath(path) => ResolvedLevel {
                    children_path: path.clone(),
                    ..global.clone()
                },
                LevelSpec::Fields(fields) => ResolvedLevel {
                    children_path: fields
                        .children_path
                        .clone()
                        .unwrap_or_else(|| global.children_path.clone()),
                    area_path: fields
                        .area_path
                        .clone()
                        .unwrap_or_else(|| global.area_path.clone()),
                    color_path: fields
                        .color_path
                        .clone()
                        .unwrap_or_else(|| global.color_path.clone()),
                    palette: fields
                        .color_palette
                        .as_ref()
                        .and_then(PaletteSpec::resolve)
                        .unwrap_or_else(|| global.palette.clone()),
                },
            })
            .collect();
        (levels, global)
    }
}
