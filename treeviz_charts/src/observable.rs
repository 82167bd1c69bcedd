// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal observable value.
//!
//! [`Observable`] stores a value plus a revision counter that bumps on every change, and calls
//! its subscribers synchronously from [`Observable::set`]. Owners that cannot be called back
//! (because they hold the observable themselves) compare [`Observable::revision`] instead.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Handle returned by [`Observable::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// A value whose changes can be observed.
pub struct Observable<T> {
    value: T,
    revision: u64,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T: core::fmt::Debug> core::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    /// Wraps `value`.
    pub fn new(value: T) -> Self {
        Self {
            value,
            revision: 0,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Returns the change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers `callback` to run after every change.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Stores `value` and notifies subscribers, even if it equals the current value.
    pub fn replace(&mut self, value: T) {
        self.value = value;
        self.revision = self.revision.wrapping_add(1);
        for (_, callback) in &mut self.subscribers {
            callback(&self.value);
        }
    }
}

impl<T: PartialEq> Observable<T> {
    /// Stores `value` and notifies subscribers if it differs from the current one.
    ///
    /// Returns whether the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.replace(value);
        true
    }
}
