// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained scene: an arena of shape objects with per-object event hooks.
//!
//! Objects form a shallow tree (node groups at the top level, their body and label shapes
//! below). Child shapes are positioned relative to their parent group's `left`/`top`.
//! Renderers walk [`Scene::ordered`] and draw each group's children in insertion order.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::geometry::Visual;
use crate::shape::{Prop, PropError, PropValue, Shape};

/// Separator between names in a path-derived [`NodeKey`].
pub const KEY_SEPARATOR: &str = " > ";

/// Identifier of a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Stable identity of a logical node across layout passes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(Arc<str>);

impl NodeKey {
    /// Creates a key from a string.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Creates a key by joining a root-to-node name path.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = alloc::string::String::new();
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                joined.push_str(KEY_SEPARATOR);
            }
            joined.push_str(name.as_ref());
        }
        Self(joined.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a keyed scene object.
///
/// `Entering` and `Updating` settle into `Steady` when their transition completes. `Exiting`
/// ends in `Removed`, which is only observable on objects returned by [`Scene::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Created and animating in.
    Entering,
    /// At rest.
    Steady,
    /// Animating towards new geometry.
    Updating,
    /// Animating out; removed when the transition completes.
    Exiting,
    /// Detached from the scene.
    Removed,
}

/// Pointer events an object can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer or touch pressed.
    Press,
    /// Short press and release.
    Tap,
    /// Long press.
    Hold,
    /// Pointer or touch released.
    Release,
}

/// Errors returned by [`Scene::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No object with this id exists.
    UnknownObject(ObjectId),
    /// The shape rejected the property.
    Prop(PropError),
}

impl From<PropError> for SceneError {
    fn from(err: PropError) -> Self {
        Self::Prop(err)
    }
}

/// A live shape in the scene.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Object id.
    pub id: ObjectId,
    /// Identity of the logical node this object represents, if any.
    pub key: Option<NodeKey>,
    /// Parent group.
    pub parent: Option<ObjectId>,
    /// Child objects in draw order.
    pub children: SmallVec<[ObjectId; 2]>,
    /// Current shape state.
    pub shape: Shape,
    /// Render order; lower values draw first.
    pub z_index: i32,
    /// Tie-break within a `z_index`; bumped by [`Scene::raise`].
    order: u64,
    /// Events this object responds to.
    pub listeners: SmallVec<[EventKind; 2]>,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
    /// The most recently rendered visual; the source of the next interpolation.
    pub old: Option<Visual>,
}

impl SceneObject {
    /// Returns `true` if this object has a hook for `kind`.
    pub fn listens(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }
}

/// An arena of [`SceneObject`]s.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    next_id: u64,
    next_order: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Inserts an object, appending it to `parent`'s children if given.
    ///
    /// Unknown parents are ignored and the object is inserted at the top level.
    pub fn insert(
        &mut self,
        parent: Option<ObjectId>,
        key: Option<NodeKey>,
        shape: Shape,
        z_index: i32,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let order = self.bump_order();

        let parent = parent.filter(|p| match self.objects.get_mut(p) {
            Some(p) => {
                p.children.push(id);
                true
            }
            None => false,
        });

        self.objects.insert(
            id,
            SceneObject {
                id,
                key,
                parent,
                children: SmallVec::new(),
                shape,
                z_index,
                order,
                listeners: SmallVec::new(),
                lifecycle: Lifecycle::Entering,
                old: None,
            },
        );
        id
    }

    /// Removes an object and its descendants, returning them marked [`Lifecycle::Removed`].
    pub fn remove(&mut self, id: ObjectId) -> Vec<SceneObject> {
        let mut removed = Vec::new();
        let Some(obj) = self.objects.get(&id) else {
            return removed;
        };
        if let Some(parent) = obj.parent.and_then(|p| self.objects.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(mut obj) = self.objects.remove(&next) {
                stack.extend(obj.children.iter().copied());
                obj.lifecycle = Lifecycle::Removed;
                removed.push(obj);
            }
        }
        removed
    }

    /// Sets a property on an object's shape.
    pub fn set(&mut self, id: ObjectId, prop: Prop, value: PropValue) -> Result<(), SceneError> {
        let obj = self
            .objects
            .get_mut(&id)
            .ok_or(SceneError::UnknownObject(id))?;
        obj.shape.set(prop, value)?;
        Ok(())
    }

    /// Returns an object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Iterates over all objects in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// Moves an object to the top of its `z_index` band.
    pub fn raise(&mut self, id: ObjectId) {
        let order = self.bump_order();
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.order = order;
        }
    }

    /// Enables or disables an event hook on an object.
    pub fn listen(&mut self, id: ObjectId, kind: EventKind, enabled: bool) {
        let Some(obj) = self.objects.get_mut(&id) else {
            return;
        };
        let present = obj.listens(kind);
        if enabled && !present {
            obj.listeners.push(kind);
        } else if !enabled && present {
            obj.listeners.retain(|k| *k != kind);
        }
    }

    /// Returns top-level objects in draw order, sorted by `(z_index, order)`.
    pub fn ordered(&self) -> Vec<ObjectId> {
        let mut top: Vec<&SceneObject> = self
            .objects
            .values()
            .filter(|o| o.parent.is_none())
            .collect();
        top.sort_by_key(|o| (o.z_index, o.order));
        top.into_iter().map(|o| o.id).collect()
    }

    /// Returns the top-most object under `pt` that listens for `kind`.
    ///
    /// Objects inside exiting or invisible groups are skipped.
    pub fn hit(&self, pt: Point, kind: EventKind) -> Option<ObjectId> {
        for top in self.ordered().into_iter().rev() {
            let Some(obj) = self.objects.get(&top) else {
                continue;
            };
            if matches!(obj.lifecycle, Lifecycle::Exiting | Lifecycle::Removed) {
                continue;
            }
            let (origin, visible) = match &obj.shape {
                Shape::Group(g) => (Vec2::new(g.left, g.top), g.opacity > 0.0),
                other => {
                    if obj.listens(kind) && other.contains(Vec2::ZERO, pt) {
                        return Some(obj.id);
                    }
                    continue;
                }
            };
            if !visible {
                continue;
            }
            for child in obj.children.iter().rev() {
                let Some(child) = self.objects.get(child) else {
                    continue;
                };
                if child.listens(kind) && child.shape.contains(origin, pt) {
                    return Some(child.id);
                }
            }
        }
        None
    }

    fn bump_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }
}
