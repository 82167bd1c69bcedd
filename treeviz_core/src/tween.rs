// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-bounded interpolations.
//!
//! A [`Timeline`] is an arena of [`Tween`] values keyed by `(target, name)`. Each tween holds its
//! endpoints, start time, duration and easing; nothing is captured in closures. A single
//! [`Timeline::advance`] pass per frame samples every active tween in registration order.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::color::Paint;
use crate::engine::ViewScales;
use crate::geometry::Visual;
use crate::scene::ObjectId;

/// Easing curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Maps linear progress `t` in `0..=1` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// What a tween animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenTarget {
    /// The shared view scales.
    View,
    /// A scene object.
    Object(ObjectId),
}

/// Per-target tween slot. Scheduling a tween into an occupied slot replaces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenName {
    /// View scale domains and ranges.
    View,
    /// Group geometry and opacity.
    Geometry,
    /// Body fill.
    Fill,
    /// Label paint.
    Label,
}

/// Tween endpoints.
#[derive(Clone, Debug, PartialEq)]
pub enum TweenKind {
    /// View scales.
    View {
        /// Start value.
        from: ViewScales,
        /// End value.
        to: ViewScales,
    },
    /// Group visual.
    Group {
        /// Start value.
        from: Visual,
        /// End value.
        to: Visual,
    },
    /// Body paint.
    Body {
        /// Start value.
        from: Paint,
        /// End value.
        to: Paint,
    },
    /// Label paint.
    Label {
        /// Start value.
        from: Paint,
        /// End value.
        to: Paint,
    },
}

/// A sampled tween value.
#[derive(Clone, Debug, PartialEq)]
pub enum Sample {
    /// View scales.
    View(ViewScales),
    /// Group visual.
    Group(Visual),
    /// Body paint.
    Body(Paint),
    /// Label paint.
    Label(Paint),
}

impl TweenKind {
    /// Samples the tween at eased progress `t`.
    pub fn sample(&self, t: f64) -> Sample {
        match self {
            Self::View { from, to } => Sample::View(from.lerp(to, t)),
            Self::Group { from, to } => Sample::Group(from.lerp(to, t)),
            Self::Body { from, to } => Sample::Body(from.lerp(to, t)),
            Self::Label { from, to } => Sample::Label(from.lerp(to, t)),
        }
    }
}

/// Side effect run once a tween completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EndAction {
    /// The target settles at the end value.
    #[default]
    Settle,
    /// The target is removed from the scene.
    Remove,
}

/// A scheduled interpolation.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    /// Animated target.
    pub target: TweenTarget,
    /// Slot on the target.
    pub name: TweenName,
    /// Start time in milliseconds.
    pub start: f64,
    /// Duration in milliseconds.
    pub duration: f64,
    /// Easing curve.
    pub easing: Easing,
    /// Endpoints.
    pub kind: TweenKind,
    /// Completion side effect.
    pub on_end: EndAction,
}

impl Tween {
    /// Creates a tween with the default easing and [`EndAction::Settle`].
    pub fn new(
        target: TweenTarget,
        name: TweenName,
        start: f64,
        duration: f64,
        kind: TweenKind,
    ) -> Self {
        Self {
            target,
            name,
            start,
            duration,
            easing: Easing::default(),
            kind,
            on_end: EndAction::Settle,
        }
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the completion side effect.
    #[must_use]
    pub fn with_end_action(mut self, on_end: EndAction) -> Self {
        self.on_end = on_end;
        self
    }

    /// Returns linear progress at `now`, clamped to `0..=1`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

/// A tween that finished during [`Timeline::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finished {
    /// Animated target.
    pub target: TweenTarget,
    /// Slot on the target.
    pub name: TweenName,
    /// Completion side effect.
    pub on_end: EndAction,
}

/// The set of active tweens, in registration order.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    active: Vec<Tween>,
    slots: HashSet<(TweenTarget, TweenName)>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of active tweens.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` if no tweens are active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Returns the active tween in a slot.
    pub fn get(&self, target: TweenTarget, name: TweenName) -> Option<&Tween> {
        self.active
            .iter()
            .find(|t| t.target == target && t.name == name)
    }

    /// Schedules a tween, replacing any tween in the same `(target, name)` slot.
    ///
    /// The replaced tween's remaining frames and completion action are dropped; whatever it
    /// already rendered stays. The new tween runs after all previously registered ones.
    pub fn schedule(&mut self, tween: Tween) {
        let slot = (tween.target, tween.name);
        if !self.slots.insert(slot) {
            self.active.retain(|t| (t.target, t.name) != slot);
        }
        self.active.push(tween);
    }

    /// Drops the tween in a slot, if any.
    pub fn cancel(&mut self, target: TweenTarget, name: TweenName) {
        if self.slots.remove(&(target, name)) {
            self.active.retain(|t| (t.target, t.name) != (target, name));
        }
    }

    /// Drops every tween targeting `id`.
    pub fn cancel_object(&mut self, id: ObjectId) {
        let target = TweenTarget::Object(id);
        self.active.retain(|t| t.target != target);
        self.slots.retain(|(t, _)| *t != target);
    }

    /// Samples every active tween at `now`, in registration order, and retires finished ones.
    ///
    /// `apply` receives each target with its sampled value. Completed tweens are sampled at
    /// exactly their end value before being returned.
    pub fn advance(
        &mut self,
        now: f64,
        mut apply: impl FnMut(TweenTarget, Sample),
    ) -> Vec<Finished> {
        let mut finished = Vec::new();
        for tween in &self.active {
            let p = tween.progress(now);
            apply(tween.target, tween.kind.sample(tween.easing.apply(p)));
            if p >= 1.0 {
                finished.push(Finished {
                    target: tween.target,
                    name: tween.name,
                    on_end: tween.on_end,
                });
            }
        }
        if !finished.is_empty() {
            self.active.retain(|t| t.progress(now) < 1.0);
            for f in &finished {
                self.slots.remove(&(f.target, f.name));
            }
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::geometry::{Geometry, Partition};
    use peniko::Color;

    fn group_tween(id: u64, start: f64, from: f64, to: f64) -> Tween {
        let visual = |x| Visual::opaque(Geometry::Partition(Partition::new(x, 0.0, 1.0, 1.0)));
        Tween::new(
            TweenTarget::Object(ObjectId(id)),
            TweenName::Geometry,
            start,
            100.0,
            TweenKind::Group {
                from: visual(from),
                to: visual(to),
            },
        )
    }

    fn x_of(sample: &Sample) -> f64 {
        match sample {
            Sample::Group(Visual {
                geom: Geometry::Partition(p),
                ..
            }) => p.x,
            _ => panic!("expected a group sample"),
        }
    }

    #[test]
    fn cubic_in_out_is_symmetric() {
        let e = Easing::CubicInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(0.5), 0.5);
        assert_eq!(e.apply(1.0), 1.0);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-12);
        assert_eq!(e.apply(0.25), 0.0625);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn same_slot_replaces_and_moves_to_the_back() {
        let mut timeline = Timeline::new();
        timeline.schedule(group_tween(1, 0.0, 0.0, 10.0));
        timeline.schedule(group_tween(2, 0.0, 0.0, 10.0));
        timeline.schedule(group_tween(1, 50.0, 5.0, 20.0).with_easing(Easing::Linear));
        assert_eq!(timeline.len(), 2);

        let mut seen = std::vec::Vec::new();
        timeline.advance(100.0, |target, sample| seen.push((target, x_of(&sample))));
        assert_eq!(seen[0].0, TweenTarget::Object(ObjectId(2)));
        assert_eq!(seen[1], (TweenTarget::Object(ObjectId(1)), 12.5));
    }

    #[test]
    fn finished_tweens_land_on_their_end_value() {
        let mut timeline = Timeline::new();
        timeline.schedule(group_tween(1, 0.0, 0.0, 10.0).with_end_action(EndAction::Remove));
        let mut last = 0.0;
        let done = timeline.advance(250.0, |_, s| last = x_of(&s));
        assert_eq!(last, 10.0);
        assert_eq!(
            done,
            std::vec![Finished {
                target: TweenTarget::Object(ObjectId(1)),
                name: TweenName::Geometry,
                on_end: EndAction::Remove,
            }]
        );
        assert!(timeline.is_empty());
        // The slot is free again.
        timeline.schedule(group_tween(1, 0.0, 0.0, 10.0));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn cancel_object_drops_all_slots() {
        let mut timeline = Timeline::new();
        timeline.schedule(group_tween(1, 0.0, 0.0, 10.0));
        timeline.schedule(Tween::new(
            TweenTarget::Object(ObjectId(1)),
            TweenName::Fill,
            0.0,
            100.0,
            TweenKind::Body {
                from: Paint::from_color(Color::BLACK),
                to: Paint::from_color(Color::WHITE),
            },
        ));
        timeline.schedule(group_tween(3, 0.0, 0.0, 10.0));
        timeline.cancel_object(ObjectId(1));
        assert_eq!(timeline.len(), 1);
        assert!(timeline.get(TweenTarget::Object(ObjectId(3)), TweenName::Geometry).is_some());
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut timeline = Timeline::new();
        let mut tween = group_tween(1, 10.0, 0.0, 4.0);
        tween.duration = 0.0;
        timeline.schedule(tween);
        let done = timeline.advance(10.0, |_, _| {});
        assert_eq!(done.len(), 1);
    }
}
