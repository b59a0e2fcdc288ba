// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered option storage.
//!
//! This module provides [`OptionStore`], the key/value container behind every
//! options object. Each key holds exactly one [`Value`]: a literal, a nested
//! container, or a callback. Writing a literal replaces a callback stored under
//! the same key and vice versa.
//!
//! # Change tracking
//!
//! Every store carries a revision counter that only moves on actual changes.
//! The counter reported by [`OptionStore::revision`] includes the revisions of
//! nested containers, so writes made through [`OptionStore::nested_mut`] are
//! visible on the parent.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::callback::CallbackHandle;
use crate::key::Key;
use crate::value::{FromValue, SCRIPTABLE_MARKER, Value, ValueType};

/// An ordered container of options.
///
/// # Example
///
/// ```rust
/// use understory_option::{CallbackHandle, OptionStore, ValueType};
///
/// let mut store = OptionStore::new();
/// store.set("borderWidth", 2.0);
/// assert_eq!(store.get("borderWidth", 0.0), 2.0);
/// assert_eq!(store.value_type("borderWidth"), ValueType::Number);
///
/// // A callback replaces the literal.
/// store.set_callback("borderWidth", Some(CallbackHandle::new(())));
/// assert_eq!(store.value_type("borderWidth"), ValueType::Function);
/// assert_eq!(store.get("borderWidth", 0.0), 0.0);
///
/// // Clearing the callback removes the key entirely.
/// store.set_callback("borderWidth", None);
/// assert!(!store.has("borderWidth"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct OptionStore {
    entries: IndexMap<Key, Value>,
    revision: u64,
}

impl OptionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a previously serialized native object.
    ///
    /// Anything other than a JSON object yields an empty store. Callback
    /// placeholders cannot be turned back into callbacks and are skipped.
    #[must_use]
    pub fn from_native(native: &serde_json::Value) -> Self {
        let mut store = Self::new();
        let Some(object) = native.as_object() else {
            tracing::debug!(kind = ?native, "native options are not an object, starting empty");
            return store;
        };
        for (name, value) in object {
            if value
                .as_object()
                .is_some_and(|o| o.contains_key(SCRIPTABLE_MARKER))
            {
                tracing::debug!(key = %name, "skipping callback placeholder in native options");
                continue;
            }
            store
                .entries
                .insert(Key::owned(name.as_str()), Value::from_native(value));
        }
        store
    }

    /// Returns the number of stored keys.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keys are stored.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the stored keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.entries.keys()
    }

    /// Returns the stored entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> + '_ {
        self.entries.iter()
    }

    /// Returns the revision of this store and everything nested in it.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.entries
            .values()
            .filter_map(Value::as_object)
            .fold(self.revision, |acc, nested| {
                acc.wrapping_add(nested.revision())
            })
    }

    fn bump_revision(&mut self, by: u64) {
        self.revision = self.revision.wrapping_add(by);
    }

    /// Returns the raw stored value, if any.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the stored literal converted to `T`, or `default`.
    ///
    /// The default is returned when the key is absent, holds a callback, or
    /// holds a value of another shape.
    #[must_use]
    pub fn get<T: FromValue>(&self, key: &str, default: T) -> T {
        self.value(key)
            .filter(|v| !v.is_callback())
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    /// Stores a value, replacing whatever the key held before.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if self.entries.get(key.as_str()) == Some(&value) {
            return;
        }
        let previous = self.entries.insert(key, value);
        let dropped = previous
            .as_ref()
            .and_then(Value::as_object)
            .map_or(0, Self::revision);
        self.bump_revision(dropped.wrapping_add(1));
    }

    /// Stores a callback, or removes the key when `callback` is `None`.
    pub fn set_callback(&mut self, key: impl Into<Key>, callback: Option<CallbackHandle>) {
        match callback {
            Some(handle) => self.set(key, Value::Callback(handle)),
            None => {
                let key = key.into();
                self.remove(key.as_str());
            }
        }
    }

    /// Returns the callback stored under `key`, if the key holds one.
    #[must_use]
    pub fn callback(&self, key: &str) -> Option<&CallbackHandle> {
        self.value(key).and_then(Value::as_callback)
    }

    /// Returns `true` if the key holds a literal or a callback.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the key and both of its possible representations.
    ///
    /// Returns `true` if something was removed. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.shift_remove(key) {
            Some(previous) => {
                let dropped = previous.as_object().map_or(0, Self::revision);
                self.bump_revision(dropped.wrapping_add(1));
                true
            }
            None => false,
        }
    }

    /// Returns the type of the stored value, or [`ValueType::Undefined`].
    #[must_use]
    pub fn value_type(&self, key: &str) -> ValueType {
        self.value(key)
            .map_or(ValueType::Undefined, Value::value_type)
    }

    /// Returns the nested container stored under `key`.
    #[must_use]
    pub fn nested(&self, key: &str) -> Option<&Self> {
        self.value(key).and_then(Value::as_object)
    }

    /// Returns the nested container stored under `key`, creating it if needed.
    ///
    /// A non-container value stored under `key` is replaced.
    pub fn nested_mut(&mut self, key: impl Into<Key>) -> &mut Self {
        let key = key.into();
        if !matches!(self.entries.get(key.as_str()), Some(Value::Object(_))) {
            self.set(key.clone(), Value::Object(Self::new()));
        }
        match self.entries.get_mut(key.as_str()) {
            Some(Value::Object(nested)) => nested,
            _ => unreachable!("nested container was inserted above"),
        }
    }

    /// Deep-merges `other` into this store.
    ///
    /// Nested containers present on both sides are merged key by key; every
    /// other value from `other` replaces the local one.
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            match value {
                Value::Object(theirs) if self.nested(key.as_str()).is_some() => {
                    self.nested_mut(key).merge_from(theirs);
                }
                _ => self.set(key, value.clone()),
            }
        }
    }

    /// Exports the store as a native (JSON) object.
    ///
    /// Callbacks are exported as `{"__scriptable__": "<key>"}` placeholders.
    #[must_use]
    pub fn to_native(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for OptionStore {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

struct Placeholder<'a>(&'a Key);

impl Serialize for Placeholder<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(SCRIPTABLE_MARKER, self.0.as_str())?;
        map.end()
    }
}

impl Serialize for OptionStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            if value.is_callback() {
                map.serialize_entry(key.as_str(), &Placeholder(key))?;
            } else {
                map.serialize_entry(key.as_str(), value)?;
            }
        }
        map.end()
    }
}
