// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape kinds and their settable properties.
//!
//! Every shape kind exposes a fixed set of properties. [`ShapeKind::props`] is the lookup table
//! used to validate [`Shape::set`]; there is no name-based dispatch.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_2;

use kurbo::{BezPath, Circle, Point, Rect, Shape as _, Vec2};
use peniko::Color;

use crate::measure::TextStyle;

/// The kind of a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A translation/opacity container for child shapes.
    Group,
    /// An axis-aligned rectangle.
    Rect,
    /// An annular sector.
    Arc,
    /// A closed polygon.
    Polygon,
    /// A single line of text.
    Text,
}

/// A settable shape property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Horizontal offset relative to the parent.
    Left,
    /// Vertical offset relative to the parent.
    Top,
    /// Rectangle width.
    Width,
    /// Rectangle height.
    Height,
    /// Opacity in `0..=1`.
    Opacity,
    /// Fill colour.
    Fill,
    /// Arc inner radius.
    InnerRadius,
    /// Arc outer radius.
    OuterRadius,
    /// Arc start angle, radians clockwise from 12 o'clock.
    StartAngle,
    /// Arc end angle, radians clockwise from 12 o'clock.
    EndAngle,
    /// Text rotation in degrees.
    Angle,
    /// Polygon points.
    Points,
    /// Horizontal text anchor.
    Anchor,
    /// Vertical text baseline.
    Baseline,
}

const GROUP_PROPS: &[Prop] = &[Prop::Left, Prop::Top, Prop::Opacity];
const RECT_PROPS: &[Prop] = &[
    Prop::Left,
    Prop::Top,
    Prop::Width,
    Prop::Height,
    Prop::Fill,
    Prop::Opacity,
];
const ARC_PROPS: &[Prop] = &[
    Prop::InnerRadius,
    Prop::OuterRadius,
    Prop::StartAngle,
    Prop::EndAngle,
    Prop::Fill,
    Prop::Opacity,
];
const POLYGON_PROPS: &[Prop] = &[Prop::Points, Prop::Fill, Prop::Opacity];
const TEXT_PROPS: &[Prop] = &[
    Prop::Left,
    Prop::Top,
    Prop::Angle,
    Prop::Anchor,
    Prop::Baseline,
    Prop::Fill,
    Prop::Opacity,
];

impl ShapeKind {
    /// Returns the properties this kind accepts.
    pub fn props(self) -> &'static [Prop] {
        match self {
            Self::Group => GROUP_PROPS,
            Self::Rect => RECT_PROPS,
            Self::Arc => ARC_PROPS,
            Self::Polygon => POLYGON_PROPS,
            Self::Text => TEXT_PROPS,
        }
    }

    /// Returns `true` if `prop` is settable on this kind.
    pub fn supports(self, prop: Prop) -> bool {
        self.props().contains(&prop)
    }
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Anchor at the start of the text.
    #[default]
    Start,
    /// Anchor at the middle of the text.
    Middle,
    /// Anchor at the end of the text.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Vertically centred on the anchor.
    #[default]
    Middle,
    /// Top of the text at the anchor.
    Hanging,
}

/// A property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// A scalar value.
    Scalar(f64),
    /// A colour.
    Color(Color),
    /// A point list.
    Points(Vec<Point>),
    /// A text anchor.
    Anchor(TextAnchor),
    /// A text baseline.
    Baseline(TextBaseline),
}

/// Errors returned by [`Shape::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropError {
    /// The property is not part of this kind's property table.
    Unsupported {
        /// The shape kind.
        kind: ShapeKind,
        /// The rejected property.
        prop: Prop,
    },
    /// The value has the wrong type for the property.
    TypeMismatch(Prop),
}

/// A group: translation and opacity applied to its children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupShape {
    /// Horizontal offset.
    pub left: f64,
    /// Vertical offset.
    pub top: f64,
    /// Opacity.
    pub opacity: f64,
}

/// A rectangle positioned relative to its parent group.
#[derive(Clone, Debug, PartialEq)]
pub struct RectShape {
    /// Horizontal offset.
    pub left: f64,
    /// Vertical offset.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Fill colour.
    pub fill: Color,
    /// Opacity.
    pub opacity: f64,
}

/// An annular sector centred on its parent group's origin.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcShape {
    /// Inner radius.
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
    /// Start angle, radians clockwise from 12 o'clock.
    pub start_angle: f64,
    /// End angle, radians clockwise from 12 o'clock.
    pub end_angle: f64,
    /// Fill colour.
    pub fill: Color,
    /// Opacity.
    pub opacity: f64,
}

/// A closed polygon in its parent group's coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonShape {
    /// Polygon vertices.
    pub points: Vec<Point>,
    /// Fill colour.
    pub fill: Color,
    /// Opacity.
    pub opacity: f64,
}

/// A single line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    /// Text content.
    pub text: String,
    /// Font style used for measurement.
    pub style: TextStyle,
    /// Measured `(width, height)`.
    pub extent: (f64, f64),
    /// Horizontal offset.
    pub left: f64,
    /// Vertical offset.
    pub top: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill colour.
    pub fill: Color,
    /// Opacity.
    pub opacity: f64,
}

/// Shape state, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A group.
    Group(GroupShape),
    /// A rectangle.
    Rect(RectShape),
    /// An arc.
    Arc(ArcShape),
    /// A polygon.
    Polygon(PolygonShape),
    /// Text.
    Text(TextShape),
}

impl Shape {
    /// Creates a transparent, empty shape of the given kind.
    ///
    /// Text shapes are created through [`Shape::text`], which needs a measured extent; this
    /// constructor gives them empty content.
    pub fn empty(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Group => Self::Group(GroupShape::default()),
            ShapeKind::Rect => Self::Rect(RectShape {
                left: 0.0,
                top: 0.0,
                width: 0.0,
                height: 0.0,
                fill: Color::TRANSPARENT,
                opacity: 0.0,
            }),
            ShapeKind::Arc => Self::Arc(ArcShape {
                inner_radius: 0.0,
                outer_radius: 0.0,
                start_angle: 0.0,
                end_angle: 0.0,
                fill: Color::TRANSPARENT,
                opacity: 0.0,
            }),
            ShapeKind::Polygon => Self::Polygon(PolygonShape {
                points: Vec::new(),
                fill: Color::TRANSPARENT,
                opacity: 0.0,
            }),
            ShapeKind::Text => Self::text(String::new(), TextStyle::default(), (0.0, 0.0)),
        }
    }

    /// Creates a text shape with a measured extent.
    pub fn text(text: String, style: TextStyle, extent: (f64, f64)) -> Self {
        Self::Text(TextShape {
            text,
            style,
            extent,
            left: 0.0,
            top: 0.0,
            angle: 0.0,
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Middle,
            fill: Color::BLACK,
            opacity: 0.0,
        })
    }

    /// Returns this shape's kind.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Group(_) => ShapeKind::Group,
            Self::Rect(_) => ShapeKind::Rect,
            Self::Arc(_) => ShapeKind::Arc,
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::Text(_) => ShapeKind::Text,
        }
    }

    /// Returns the shape's opacity.
    pub fn opacity(&self) -> f64 {
        match self {
            Self::Group(s) => s.opacity,
            Self::Rect(s) => s.opacity,
            Self::Arc(s) => s.opacity,
            Self::Polygon(s) => s.opacity,
            Self::Text(s) => s.opacity,
        }
    }

    /// Returns the shape's fill, if the kind has one.
    pub fn fill(&self) -> Option<Color> {
        match self {
            Self::Group(_) => None,
            Self::Rect(s) => Some(s.fill),
            Self::Arc(s) => Some(s.fill),
            Self::Polygon(s) => Some(s.fill),
            Self::Text(s) => Some(s.fill),
        }
    }

    /// Sets a property, validating it against the kind's property table.
    pub fn set(&mut self, prop: Prop, value: PropValue) -> Result<(), PropError> {
        let kind = self.kind();
        if !kind.supports(prop) {
            return Err(PropError::Unsupported { kind, prop });
        }
        match (self, prop, value) {
            (Self::Group(s), Prop::Left, PropValue::Scalar(v)) => s.left = v,
            (Self::Group(s), Prop::Top, PropValue::Scalar(v)) => s.top = v,
            (Self::Group(s), Prop::Opacity, PropValue::Scalar(v)) => s.opacity = v,

            (Self::Rect(s), Prop::Left, PropValue::Scalar(v)) => s.left = v,
            (Self::Rect(s), Prop::Top, PropValue::Scalar(v)) => s.top = v,
            (Self::Rect(s), Prop::Width, PropValue::Scalar(v)) => s.width = v,
            (Self::Rect(s), Prop::Height, PropValue::Scalar(v)) => s.height = v,
            (Self::Rect(s), Prop::Fill, PropValue::Color(c)) => s.fill = c,
            (Self::Rect(s), Prop::Opacity, PropValue::Scalar(v)) => s.opacity = v,

            (Self::Arc(s), Prop::InnerRadius, PropValue::Scalar(v)) => s.inner_radius = v,
            (Self::Arc(s), Prop::OuterRadius, PropValue::Scalar(v)) => s.outer_radius = v,
            (Self::Arc(s), Prop::StartAngle, PropValue::Scalar(v)) => s.start_angle = v,
            (Self::Arc(s), Prop::EndAngle, PropValue::Scalar(v)) => s.end_angle = v,
            (Self::Arc(s), Prop::Fill, PropValue::Color(c)) => s.fill = c,
            (Self::Arc(s), Prop::Opacity, PropValue::Scalar(v)) => s.opacity = v,

            (Self::Polygon(s), Prop::Points, PropValue::Points(p)) => s.points = p,
            (Self::Polygon(s), Prop::Fill, PropValue::Color(c)) => s.fill = c,
            (Self::Polygon(s), Prop::Opacity, PropValue::Scalar(v)) => s.opacity = v,

            (Self::Text(s), Prop::Left, PropValue::Scalar(v)) => s.left = v,
            (Self::Text(s), Prop::Top, PropValue::Scalar(v)) => s.top = v,
            (Self::Text(s), Prop::Angle, PropValue::Scalar(v)) => s.angle = v,
            (Self::Text(s), Prop::Anchor, PropValue::Anchor(a)) => s.anchor = a,
            (Self::Text(s), Prop::Baseline, PropValue::Baseline(b)) => s.baseline = b,
            (Self::Text(s), Prop::Fill, PropValue::Color(c)) => s.fill = c,
            (Self::Text(s), Prop::Opacity, PropValue::Scalar(v)) => s.opacity = v,

            (_, prop, _) => return Err(PropError::TypeMismatch(prop)),
        }
        Ok(())
    }

    /// Returns `true` if `pt` (in the coordinates of this shape's parent group, whose origin is
    /// `origin`) falls inside the shape. Groups and text never hit.
    pub fn contains(&self, origin: Vec2, pt: Point) -> bool {
        let local = pt - origin;
        match self {
            Self::Group(_) | Self::Text(_) => false,
            Self::Rect(r) => {
                Rect::new(r.left, r.top, r.left + r.width, r.top + r.height).contains(local)
            }
            Self::Arc(a) => {
                let sweep = a.end_angle - a.start_angle;
                if sweep <= 0.0 || a.outer_radius <= a.inner_radius {
                    return false;
                }
                // Arc angles run clockwise from 12 o'clock; kurbo measures from +x.
                Circle::new(Point::ORIGIN, a.outer_radius)
                    .segment(a.inner_radius, a.start_angle - FRAC_PI_2, sweep)
                    .contains(local)
            }
            Self::Polygon(p) => polygon_path(&p.points).contains(local),
        }
    }
}

/// Builds a closed path through `points`.
pub fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}
