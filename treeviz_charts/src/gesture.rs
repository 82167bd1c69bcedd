// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transient pan/pinch/rotate feedback.
//!
//! [`GestureTransform`] accumulates multi-touch deltas into a translation, a uniform scale and
//! a rotation. The transform is layered over the rendered scene while a gesture is active and
//! snaps back to identity when the gesture ends; it never changes the zoom state.
//!
//! ```
//! use kurbo::Point;
//! use treeviz_charts::{GestureEvent, GestureTransform};
//!
//! let mut gesture = GestureTransform::new().with_touch(true);
//! gesture.handle(&GestureEvent::start([Point::new(10.0, 10.0)]));
//! gesture.handle(&GestureEvent::moved([Point::new(15.0, 20.0)]));
//! assert_eq!((gesture.left, gesture.top), (5.0, 10.0));
//!
//! gesture.handle(&GestureEvent::end([]));
//! assert!(gesture.is_identity());
//! ```

use kurbo::{Affine, Point, Vec2};
use smallvec::SmallVec;

/// Touch points of one event; two inline cover pinch gestures.
pub type Touches = SmallVec<[Point; 2]>;

/// Phase of a gesture event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Touches went down.
    Start,
    /// Touches moved.
    Move,
    /// Touches were lifted.
    End,
}

/// A normalized multi-touch event.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// Gesture phase.
    pub phase: GesturePhase,
    /// Current touch points.
    pub touches: Touches,
}

impl GestureEvent {
    /// Creates an event.
    pub fn new(phase: GesturePhase, touches: impl IntoIterator<Item = Point>) -> Self {
        Self {
            phase,
            touches: touches.into_iter().collect(),
        }
    }

    /// Creates a [`GesturePhase::Start`] event.
    pub fn start(touches: impl IntoIterator<Item = Point>) -> Self {
        Self::new(GesturePhase::Start, touches)
    }

    /// Creates a [`GesturePhase::Move`] event.
    pub fn moved(touches: impl IntoIterator<Item = Point>) -> Self {
        Self::new(GesturePhase::Move, touches)
    }

    /// Creates a [`GesturePhase::End`] event.
    pub fn end(touches: impl IntoIterator<Item = Point>) -> Self {
        Self::new(GesturePhase::End, touches)
    }
}

/// Accumulated gesture transform state.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureTransform {
    /// Horizontal translation.
    pub left: f64,
    /// Vertical translation.
    pub top: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Whether touch gestures are handled at all.
    pub enable_touch: bool,
    /// Whether pinching scales.
    pub enable_zoom: bool,
    /// Whether twisting rotates.
    pub enable_rotate: bool,
    last_touches: Touches,
    last_center: Point,
}

impl Default for GestureTransform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale: 1.0,
            rotation: 0.0,
            enable_touch: false,
            enable_zoom: false,
            enable_rotate: false,
            last_touches: Touches::new(),
            last_center: Point::ORIGIN,
        }
    }
}

impl GestureTransform {
    /// Creates an identity transform with every gesture disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables touch handling.
    #[must_use]
    pub fn with_touch(mut self, enabled: bool) -> Self {
        self.enable_touch = enabled;
        self
    }

    /// Enables or disables pinch scaling.
    #[must_use]
    pub fn with_zoom(mut self, enabled: bool) -> Self {
        self.enable_zoom = enabled;
        self
    }

    /// Enables or disables two-finger rotation.
    #[must_use]
    pub fn with_rotate(mut self, enabled: bool) -> Self {
        self.enable_rotate = enabled;
        self
    }

    /// Returns `true` if no gesture offset is applied.
    pub fn is_identity(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.scale == 1.0 && self.rotation == 0.0
    }

    /// The transform to layer over the scene: translate, then scale, then rotate.
    pub fn affine(&self) -> Affine {
        Affine::translate((self.left, self.top))
            * Affine::scale(self.scale)
            * Affine::rotate(self.rotation)
    }

    /// Returns to identity and forgets the tracked touches.
    pub fn reset(&mut self) {
        self.left = 0.0;
        self.top = 0.0;
        self.scale = 1.0;
        self.rotation = 0.0;
        self.last_touches.clear();
        self.last_center = Point::ORIGIN;
    }

    /// Feeds one event. Returns `true` if the transform changed.
    pub fn handle(&mut self, event: &GestureEvent) -> bool {
        if !self.enable_touch {
            return false;
        }
        match event.phase {
            GesturePhase::Start => {
                self.track(&event.touches);
                false
            }
            GesturePhase::Move => self.moved(&event.touches),
            GesturePhase::End => {
                let changed = !self.is_identity();
                self.reset();
                changed
            }
        }
    }

    fn track(&mut self, touches: &[Point]) {
        self.last_touches = touches.iter().copied().collect();
        self.last_center = center(touches);
    }

    fn moved(&mut self, touches: &[Point]) -> bool {
        // A finger was added or lifted mid-gesture: restart from the new set.
        if touches.len() != self.last_touches.len() {
            self.track(touches);
            return false;
        }
        let changed = match (touches, self.last_touches.as_slice()) {
            ([t0], [l0]) => {
                let delta = *t0 - *l0;
                self.left += delta.x;
                self.top += delta.y;
                delta != Vec2::ZERO
            }
            ([t0, t1, ..], [l0, l1, ..]) => self.pinch([*t0, *t1], [*l0, *l1]),
            _ => false,
        };
        self.track(touches);
        changed
    }

    fn pinch(&mut self, now: [Point; 2], last: [Point; 2]) -> bool {
        let c = now[0].midpoint(now[1]);
        let lc = last[0].midpoint(last[1]);
        let last_dist = (last[1] - last[0]).hypot();
        let scale_diff = if self.enable_zoom && last_dist > 0.0 {
            (now[1] - now[0]).hypot() / last_dist
        } else {
            1.0
        };
        let rotate_diff = if self.enable_rotate {
            // Angles of the first touch about the centre, measured from the +y axis.
            let angle = |p: Point, c: Point| {
                let v = p - c;
                Vec2::new(v.y, v.x).atan2()
            };
            angle(last[0], lc) - angle(now[0], c)
        } else {
            0.0
        };

        self.scale *= scale_diff;
        self.rotation += rotate_diff;
        // Keep the content under the fingers: scale and rotate the offset about the new
        // centre, then follow the centre's movement.
        let about_c = Affine::translate(c.to_vec2())
            * Affine::rotate(rotate_diff)
            * Affine::scale(scale_diff)
            * Affine::translate(-c.to_vec2());
        let moved = about_c * Point::new(self.left, self.top) + (c - lc);
        let changed = moved.x != self.left
            || moved.y != self.top
            || scale_diff != 1.0
            || rotate_diff != 0.0;
        self.left = moved.x;
        self.top = moved.y;
        changed
    }
}

fn center(touches: &[Point]) -> Point {
    match touches {
        [] => Point::ORIGIN,
        [p] => *p,
        [a, b, ..] => a.midpoint(*b),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn enabled() -> GestureTransform {
        GestureTransform::new()
            .with_touch(true)
            .with_zoom(true)
            .with_rotate(true)
    }

    #[test]
    fn disabled_touch_ignores_everything() {
        let mut gesture = GestureTransform::new();
        gesture.handle(&GestureEvent::start([Point::ZERO]));
        assert!(!gesture.handle(&GestureEvent::moved([Point::new(5.0, 5.0)])));
        assert!(gesture.is_identity());
    }

    #[test]
    fn pinch_scales_about_the_centre() {
        let mut gesture = enabled();
        gesture.handle(&GestureEvent::start([
            Point::new(90.0, 100.0),
            Point::new(110.0, 100.0),
        ]));
        assert!(gesture.handle(&GestureEvent::moved([
            Point::new(80.0, 100.0),
            Point::new(120.0, 100.0),
        ])));
        assert!((gesture.scale - 2.0).abs() < 1e-12);
        assert!(gesture.rotation.abs() < 1e-12);
        // The centre (100, 100) stays fixed, so the origin moves away from it.
        assert!((gesture.left - -100.0).abs() < 1e-9);
        assert!((gesture.top - -100.0).abs() < 1e-9);
        let fixed = gesture.affine() * Point::new(100.0, 100.0);
        assert!((fixed - Point::new(100.0, 100.0)).hypot() < 1e-9);
    }

    #[test]
    fn twist_rotates_and_release_discards() {
        let mut gesture = enabled().with_zoom(false);
        gesture.handle(&GestureEvent::start([
            Point::new(-10.0, 0.0),
            Point::new(10.0, 0.0),
        ]));
        gesture.handle(&GestureEvent::moved([
            Point::new(0.0, 10.0),
            Point::new(0.0, -10.0),
        ]));
        assert_eq!(gesture.scale, 1.0);
        assert!((gesture.rotation + core::f64::consts::FRAC_PI_2).abs() < 1e-12);

        assert!(gesture.handle(&GestureEvent::end([])));
        assert!(gesture.is_identity());
        assert_eq!(gesture.affine(), Affine::IDENTITY);
    }

    #[test]
    fn changing_the_touch_count_restarts_tracking() {
        let mut gesture = enabled();
        gesture.handle(&GestureEvent::start([Point::new(0.0, 0.0)]));
        assert!(!gesture.handle(&GestureEvent::moved([
            Point::new(50.0, 0.0),
            Point::new(70.0, 0.0),
        ])));
        assert!(gesture.is_identity());
        gesture.handle(&GestureEvent::moved([
            Point::new(55.0, 0.0),
            Point::new(75.0, 0.0),
        ]));
        assert_eq!((gesture.left, gesture.top), (5.0, 0.0));
    }
}
