// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a rendered scene.

use std::f64::consts::FRAC_PI_2;
use std::fmt::Write as _;

use kurbo::{Affine, Circle, Point, Shape as _};
use peniko::Color;
use treeviz_core::{Scene, Shape, TextAnchor, TextBaseline, polygon_path};

/// Renders `scene` into a `width × height` SVG document, with `transform` applied to everything.
pub(crate) fn to_svg_string(scene: &Scene, width: f64, height: f64, transform: Affine) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    );
    let c = transform.as_coeffs();
    let _ = writeln!(
        out,
        r#"<g transform="matrix({} {} {} {} {} {})">"#,
        c[0], c[1], c[2], c[3], c[4], c[5]
    );

    for group in scene.ordered().into_iter().filter_map(|id| scene.get(id)) {
        let Shape::Group(g) = &group.shape else {
            continue;
        };
        if g.opacity <= 0.0 {
            continue;
        }
        let _ = writeln!(
            out,
            r#"<g transform="translate({} {})" opacity="{}">"#,
            g.left, g.top, g.opacity
        );
        for child in group.children.iter().filter_map(|id| scene.get(*id)) {
            write_shape(&mut out, &child.shape);
        }
        out.push_str("</g>\n");
    }

    out.push_str("</g>\n</svg>\n");
    out
}

fn write_shape(out: &mut String, shape: &Shape) {
    if shape.opacity() <= 0.0 {
        return;
    }
    match shape {
        Shape::Group(_) => {}
        Shape::Rect(r) => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.left, r.top, r.width, r.height
            );
            write_fill(out, r.fill, r.opacity);
            out.push_str(r##" stroke="#fff"/>"##);
            out.push('\n');
        }
        Shape::Arc(a) => {
            let sweep = a.end_angle - a.start_angle;
            if sweep <= 0.0 || a.outer_radius <= a.inner_radius {
                return;
            }
            // Arc angles run clockwise from 12 o'clock.
            let path = Circle::new(Point::ORIGIN, a.outer_radius)
                .segment(a.inner_radius, a.start_angle - FRAC_PI_2, sweep)
                .to_path(0.1);
            let _ = write!(out, r#"<path d="{}""#, path.to_svg());
            write_fill(out, a.fill, a.opacity);
            out.push_str(r##" stroke="#fff"/>"##);
            out.push('\n');
        }
        Shape::Polygon(p) => {
            let _ = write!(out, r#"<path d="{}""#, polygon_path(&p.points).to_svg());
            write_fill(out, p.fill, p.opacity);
            out.push_str(r##" stroke="#000" stroke-width="1"/>"##);
            out.push('\n');
        }
        Shape::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Hanging => "hanging",
            };
            let anchor = match t.anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" font-family="{}" text-anchor="{anchor}" dominant-baseline="{baseline}""#,
                t.left,
                t.top,
                t.style.font_size,
                escape_xml(&t.style.font_family),
            );
            if t.angle != 0.0 {
                let _ = write!(out, r#" transform="rotate({} {} {})""#, t.angle, t.left, t.top);
            }
            write_fill(out, t.fill, t.opacity);
            let _ = writeln!(out, ">{}</text>", escape_xml(&t.text));
        }
    }
}

fn write_fill(out: &mut String, color: Color, opacity: f64) {
    let rgba = color.to_rgba8();
    let _ = write!(out, r##" fill="#{:02x}{:02x}{:02x}""##, rgba.r, rgba.g, rgba.b);
    let alpha = f64::from(rgba.a) / 255.0 * opacity;
    if alpha < 1.0 {
        let _ = write!(out, r#" fill-opacity="{alpha}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
