// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascade assembly and default lookup.
//!
//! This module provides [`Cascade`], an ordered stack of shared default scopes,
//! and [`Lookup`], the view that resolves one options item against it.

use std::cell::Cell;
use std::sync::Arc;

use smallvec::SmallVec;
use understory_option::{CallbackHandle, OptionStore, Value};

use crate::error::CascadeError;
use crate::scope::{DefaultRule, DefaultsScope, ScopeLevel};

/// Derived defaults nested deeper than this are treated as a cycle.
const MAX_DERIVATION_DEPTH: u8 = 8;

/// An ordered stack of default scopes.
///
/// Scopes are shared through `Arc`, so cloning a cascade is cheap and many
/// charts can resolve against the same global scope. Scopes never change after
/// construction: to update global defaults, build a new scope and derive a new
/// cascade with [`Cascade::with_scope`].
///
/// # Precedence
///
/// `Item` → `Chart` → `Plugin` → `Global` → `BuiltIn` → null.
///
/// # Example
///
/// ```rust
/// use understory_cascade::{Cascade, DefaultsScope, ScopeLevel};
/// use understory_option::Value;
///
/// let cascade = Cascade::builder()
///     .push(DefaultsScope::builder(ScopeLevel::BuiltIn).set("opacity", 1.0).build())
///     .push(DefaultsScope::builder(ScopeLevel::Chart).set("offset", 8.0).build())
///     .build()
///     .unwrap();
///
/// assert_eq!(cascade.resolve_default("opacity"), Value::Number(1.0));
/// assert_eq!(cascade.resolve_default("offset"), Value::Number(8.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Cascade {
    /// Sorted by level, highest precedence first.
    scopes: SmallVec<[Arc<DefaultsScope>; 5]>,
    strict: bool,
}

impl Cascade {
    /// Starts building a cascade.
    #[must_use]
    pub fn builder() -> CascadeBuilder {
        CascadeBuilder::new()
    }

    /// Returns `true` if missing defaults panic instead of resolving to null.
    #[must_use]
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the scope installed at `level`.
    #[must_use]
    pub fn scope(&self, level: ScopeLevel) -> Option<&DefaultsScope> {
        self.scopes
            .iter()
            .find(|s| s.level() == level)
            .map(|s| &**s)
    }

    /// Returns the installed scopes, highest precedence first.
    pub fn scopes(&self) -> impl Iterator<Item = &DefaultsScope> + '_ {
        self.scopes.iter().map(|s| &**s)
    }

    /// Returns a copy of this cascade with `scope` installed, replacing any
    /// scope of the same level.
    #[must_use]
    pub fn with_scope(&self, scope: impl Into<Arc<DefaultsScope>>) -> Self {
        let scope = scope.into();
        let mut next = self.clone();
        next.scopes.retain(|s| s.level() != scope.level());
        next.insert_sorted(scope);
        next
    }

    fn insert_sorted(&mut self, scope: Arc<DefaultsScope>) {
        let at = self
            .scopes
            .iter()
            .position(|s| s.level() < scope.level())
            .unwrap_or(self.scopes.len());
        self.scopes.insert(at, scope);
    }

    /// Returns a lookup with no item attached.
    #[must_use]
    pub fn lookup(&self) -> Lookup<'_> {
        Lookup::new(self)
    }

    /// Resolves the default of `key` without any item-level values.
    #[must_use]
    pub fn resolve_default(&self, key: &str) -> Value {
        self.lookup().resolve_default(key)
    }

    /// Lists the keys that have neither a global nor a built-in default.
    ///
    /// Meant for startup audits in debug builds.
    #[must_use]
    pub fn missing_global_defaults<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Vec<&'k str> {
        keys.into_iter()
            .filter(|key| {
                !self
                    .scopes
                    .iter()
                    .filter(|s| s.level() <= ScopeLevel::Global)
                    .any(|s| s.contains(key))
            })
            .collect()
    }

    fn missing(&self, key: &str) -> Value {
        if self.strict {
            panic!("no default defined for option `{key}`");
        }
        tracing::warn!(key, "no default defined for option, using null");
        Value::Null
    }
}

/// Builder for [`Cascade`].
#[derive(Debug, Default)]
pub struct CascadeBuilder {
    scopes: Vec<Arc<DefaultsScope>>,
    strict: bool,
}

impl CascadeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scope.
    #[must_use]
    pub fn push(self, scope: DefaultsScope) -> Self {
        self.push_shared(Arc::new(scope))
    }

    /// Adds a scope shared with other cascades.
    #[must_use]
    pub fn push_shared(mut self, scope: Arc<DefaultsScope>) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Makes missing defaults panic with the option name.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builds the cascade.
    ///
    /// Fails if two scopes share a level.
    pub fn build(self) -> Result<Cascade, CascadeError> {
        let mut cascade = Cascade {
            scopes: SmallVec::new(),
            strict: self.strict,
        };
        for scope in self.scopes {
            if cascade.scope(scope.level()).is_some() {
                return Err(CascadeError::DuplicateScope {
                    level: scope.level(),
                });
            }
            cascade.insert_sorted(scope);
        }
        Ok(cascade)
    }
}

/// Resolves options of one item against a [`Cascade`].
///
/// A lookup layers, from highest to lowest precedence:
///
/// 1. the item's own values ([`Lookup::with_item`]),
/// 2. item-level defaults ([`Lookup::with_overlay`]), e.g. the parent options
///    a label inherits from,
/// 3. the cascade's scopes.
///
/// Callbacks are never used as literals: [`Lookup::resolve`] and
/// [`Lookup::resolve_default`] skip them, and [`Lookup::callback`] reports the
/// callback that applies.
#[derive(Debug)]
pub struct Lookup<'a> {
    cascade: &'a Cascade,
    item: Option<&'a OptionStore>,
    overlays: SmallVec<[&'a OptionStore; 2]>,
    depth: Cell<u8>,
}

impl<'a> Lookup<'a> {
    /// Creates a lookup over `cascade` with no item.
    #[must_use]
    pub fn new(cascade: &'a Cascade) -> Self {
        Self {
            cascade,
            item: None,
            overlays: SmallVec::new(),
            depth: Cell::new(0),
        }
    }

    /// Attaches the item whose values shadow every default.
    #[must_use]
    pub fn with_item(mut self, item: &'a OptionStore) -> Self {
        self.item = Some(item);
        self
    }

    /// Adds item-level defaults below those already added.
    #[must_use]
    pub fn with_overlay(mut self, defaults: &'a OptionStore) -> Self {
        self.overlays.push(defaults);
        self
    }

    /// Returns the cascade behind this lookup.
    #[must_use]
    #[inline]
    pub fn cascade(&self) -> &'a Cascade {
        self.cascade
    }

    /// Returns the attached item.
    #[must_use]
    #[inline]
    pub fn item(&self) -> Option<&'a OptionStore> {
        self.item
    }

    /// Resolves `key`: the item's literal, or else its default.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Value {
        self.find(key).unwrap_or_else(|| self.cascade.missing(key))
    }

    /// Resolves the default of `key`, ignoring the item's own value.
    #[must_use]
    pub fn resolve_default(&self, key: &str) -> Value {
        self.find_default(key)
            .unwrap_or_else(|| self.cascade.missing(key))
    }

    /// Returns the callback that applies to `key`, if any.
    ///
    /// The first level that defines `key` decides: a literal there shadows
    /// callbacks from lower levels.
    #[must_use]
    pub fn callback(&self, key: &str) -> Option<&'a CallbackHandle> {
        for store in self.item.iter().chain(self.overlays.iter()) {
            if let Some(value) = store.value(key) {
                return value.as_callback();
            }
        }
        for scope in &self.cascade.scopes {
            if let Some(rule) = scope.get(key) {
                return match rule {
                    DefaultRule::Constant(Value::Callback(handle)) => Some(handle),
                    _ => None,
                };
            }
        }
        None
    }

    /// Resolves a nested container by deep-merging every level, lowest
    /// precedence first.
    ///
    /// Levels holding anything but a container are skipped; see
    /// [`Lookup::nested_with`] to expand shorthand values.
    #[must_use]
    pub fn nested(&self, key: &str) -> OptionStore {
        self.nested_with(key, |_| None)
    }

    /// Like [`Lookup::nested`], with `expand` turning a non-container value
    /// (such as one number standing for every side) into a container.
    ///
    /// An expanded level merges like any other, so it overrides the fields it
    /// sets at every lower level.
    #[must_use]
    pub fn nested_with(
        &self,
        key: &str,
        expand: impl Fn(&Value) -> Option<OptionStore>,
    ) -> OptionStore {
        let mut merged = OptionStore::new();
        let mut layer = |value: &Value| match value {
            Value::Object(nested) => merged.merge_from(nested),
            Value::Callback(_) => {}
            other => {
                if let Some(expanded) = expand(other) {
                    merged.merge_from(&expanded);
                }
            }
        };
        for scope in self.cascade.scopes.iter().rev() {
            if let Some(DefaultRule::Constant(value)) = scope.get(key) {
                layer(value);
            }
        }
        for store in self.overlays.iter().rev().chain(self.item.iter()) {
            if let Some(value) = store.value(key) {
                layer(value);
            }
        }
        merged
    }

    /// Returns the callback stored under `field` of the nested container
    /// `key`, if any.
    ///
    /// As with [`Lookup::callback`], the first level whose container defines
    /// `field` decides.
    #[must_use]
    pub fn nested_callback(&self, key: &str, field: &str) -> Option<&'a CallbackHandle> {
        for store in self.item.iter().chain(self.overlays.iter()) {
            if let Some(value) = store.nested(key).and_then(|nested| nested.value(field)) {
                return value.as_callback();
            }
        }
        for scope in &self.cascade.scopes {
            if let Some(DefaultRule::Constant(Value::Object(nested))) = scope.get(key)
                && let Some(value) = nested.value(field)
            {
                return value.as_callback();
            }
        }
        None
    }

    fn find(&self, key: &str) -> Option<Value> {
        if let Some(item) = self.item
            && let Some(value) = item.value(key)
            && !value.is_callback()
        {
            return Some(value.clone());
        }
        self.find_default(key)
    }

    fn find_default(&self, key: &str) -> Option<Value> {
        for store in &self.overlays {
            if let Some(value) = store.value(key)
                && !value.is_callback()
            {
                return Some(value.clone());
            }
        }
        for scope in &self.cascade.scopes {
            let derived = match scope.get(key) {
                None | Some(DefaultRule::Constant(Value::Callback(_))) => None,
                Some(DefaultRule::Constant(value)) => return Some(value.clone()),
                Some(DefaultRule::SameAs(sibling)) => {
                    self.derive(key, || self.find(sibling.as_str()))
                }
                Some(DefaultRule::Computed(compute)) => self.derive(key, || compute(self)),
            };
            if derived.is_some() {
                return derived;
            }
        }
        None
    }

    fn derive(&self, key: &str, f: impl FnOnce() -> Option<Value>) -> Option<Value> {
        let depth = self.depth.get();
        if depth >= MAX_DERIVATION_DEPTH {
            tracing::warn!(key, "derived default nests too deep, treating as undefined");
            return None;
        }
        self.depth.set(depth + 1);
        let derived = f();
        self.depth.set(depth);
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_option::ValueType;

    fn scope(level: ScopeLevel, entries: &[(&'static str, f64)]) -> DefaultsScope {
        entries
            .iter()
            .fold(DefaultsScope::builder(level), |b, (k, v)| b.set(*k, *v))
            .build()
    }

    fn full_cascade() -> Cascade {
        Cascade::builder()
            .push(scope(ScopeLevel::BuiltIn, &[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)]))
            .push(scope(ScopeLevel::Global, &[("b", 2.0), ("c", 2.0), ("d", 2.0)]))
            .push(scope(ScopeLevel::Chart, &[("c", 3.0), ("d", 3.0)]))
            .push(scope(ScopeLevel::Item, &[("d", 4.0)]))
            .build()
            .unwrap()
    }

    #[test]
    fn highest_defined_level_wins() {
        let cascade = full_cascade();
        assert_eq!(cascade.resolve_default("a"), Value::Number(1.0));
        assert_eq!(cascade.resolve_default("b"), Value::Number(2.0));
        assert_eq!(cascade.resolve_default("c"), Value::Number(3.0));
        assert_eq!(cascade.resolve_default("d"), Value::Number(4.0));
    }

    #[test]
    fn push_order_does_not_matter() {
        let cascade = Cascade::builder()
            .push(scope(ScopeLevel::Chart, &[("x", 3.0)]))
            .push(scope(ScopeLevel::BuiltIn, &[("x", 1.0)]))
            .push(scope(ScopeLevel::Global, &[("x", 2.0)]))
            .build()
            .unwrap();
        let levels: Vec<_> = cascade.scopes().map(DefaultsScope::level).collect();
        assert_eq!(
            levels,
            [ScopeLevel::Chart, ScopeLevel::Global, ScopeLevel::BuiltIn]
        );
        assert_eq!(cascade.resolve_default("x"), Value::Number(3.0));
    }

    #[test]
    fn duplicate_levels_are_rejected() {
        let err = Cascade::builder()
            .push(DefaultsScope::empty(ScopeLevel::Global))
            .push(DefaultsScope::empty(ScopeLevel::Global))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CascadeError::DuplicateScope {
                level: ScopeLevel::Global
            }
        );
    }

    #[test]
    fn item_and_overlay_precede_scopes() {
        let cascade = full_cascade();
        let mut item = OptionStore::new();
        item.set("a", 10.0);
        let mut parent = OptionStore::new();
        parent.set("a", 20.0);
        parent.set("b", 20.0);

        let lookup = cascade.lookup().with_item(&item).with_overlay(&parent);
        assert_eq!(lookup.resolve("a"), Value::Number(10.0));
        assert_eq!(lookup.resolve_default("a"), Value::Number(20.0));
        assert_eq!(lookup.resolve("b"), Value::Number(20.0));
        assert_eq!(lookup.resolve("c"), Value::Number(3.0));
    }

    #[test]
    fn sibling_derivation_sees_item_literal() {
        let cascade = Cascade::builder()
            .push(
                DefaultsScope::builder(ScopeLevel::BuiltIn)
                    .set("color", "#666")
                    .same_as("textStrokeColor", "color")
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(cascade.resolve_default("textStrokeColor"), Value::from("#666"));

        let mut item = OptionStore::new();
        item.set("color", "#123456");
        let lookup = cascade.lookup().with_item(&item);
        assert_eq!(lookup.resolve("textStrokeColor"), Value::from("#123456"));
    }

    #[test]
    fn derivation_defers_when_sibling_undefined() {
        let cascade = Cascade::builder()
            .push(scope(ScopeLevel::BuiltIn, &[("width", 5.0)]))
            .push(
                DefaultsScope::builder(ScopeLevel::Global)
                    .same_as("width", "missing")
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(cascade.resolve_default("width"), Value::Number(5.0));
    }

    #[test]
    fn computed_defaults_use_siblings() {
        let cascade = Cascade::builder()
            .push(
                DefaultsScope::builder(ScopeLevel::BuiltIn)
                    .set("size", 12.0)
                    .computed("lineHeight", |lookup| {
                        lookup
                            .resolve("size")
                            .as_f64()
                            .map(|size| Value::Number(size * 1.5))
                    })
                    .build(),
            )
            .build()
            .unwrap();
        let mut item = OptionStore::new();
        item.set("size", 20.0);
        let lookup = cascade.lookup().with_item(&item);
        assert_eq!(lookup.resolve("lineHeight"), Value::Number(30.0));
    }

    #[test]
    fn derivation_cycles_resolve_to_null() {
        let cascade = Cascade::builder()
            .push(
                DefaultsScope::builder(ScopeLevel::BuiltIn)
                    .same_as("a", "b")
                    .same_as("b", "a")
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(cascade.resolve_default("a"), Value::Null);
    }

    #[test]
    fn missing_default_is_null() {
        let cascade = full_cascade();
        assert_eq!(cascade.resolve_default("nothing"), Value::Null);
    }

    #[test]
    #[should_panic(expected = "no default defined for option `nothing`")]
    fn strict_mode_panics_on_missing_default() {
        let cascade = Cascade::builder()
            .push(DefaultsScope::empty(ScopeLevel::Global))
            .strict(true)
            .build()
            .unwrap();
        let _ = cascade.resolve_default("nothing");
    }

    #[test]
    fn audit_lists_keys_without_global_defaults() {
        let cascade = full_cascade();
        let missing = cascade.missing_global_defaults(["a", "d", "z"]);
        assert_eq!(missing, ["z"]);

        let chart_only = Cascade::builder()
            .push(scope(ScopeLevel::Chart, &[("offset", 4.0)]))
            .build()
            .unwrap();
        assert_eq!(chart_only.missing_global_defaults(["offset"]), ["offset"]);
    }

    #[test]
    fn callbacks_are_skipped_as_fallbacks() {
        let handle = CallbackHandle::new(0_u8);
        let cascade = Cascade::builder()
            .push(scope(ScopeLevel::BuiltIn, &[("rotation", 0.0)]))
            .push(
                DefaultsScope::builder(ScopeLevel::Chart)
                    .set("rotation", handle.clone())
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(cascade.resolve_default("rotation"), Value::Number(0.0));
        assert_eq!(cascade.lookup().callback("rotation"), Some(&handle));
    }

    #[test]
    fn first_defining_level_decides_callback() {
        let handle = CallbackHandle::new(0_u8);
        let cascade = Cascade::builder()
            .push(
                DefaultsScope::builder(ScopeLevel::Chart)
                    .set("rotation", handle.clone())
                    .build(),
            )
            .build()
            .unwrap();

        let mut item = OptionStore::new();
        item.set("rotation", 45.0);
        assert_eq!(cascade.lookup().with_item(&item).callback("rotation"), None);

        let empty = OptionStore::new();
        assert_eq!(
            cascade.lookup().with_item(&empty).callback("rotation"),
            Some(&handle)
        );

        let mut scripted = OptionStore::new();
        scripted.set_callback("rotation", Some(CallbackHandle::new(1_u8)));
        let found = cascade.lookup().with_item(&scripted).callback("rotation");
        assert!(found.is_some_and(|h| !h.ptr_eq(&handle)));
    }

    #[test]
    fn nested_defaults_merge_across_levels() {
        let mut builtin_font = OptionStore::new();
        builtin_font.set("size", 12.0);
        builtin_font.set("family", "sans-serif");
        let mut chart_font = OptionStore::new();
        chart_font.set("size", 14.0);

        let cascade = Cascade::builder()
            .push(
                DefaultsScope::builder(ScopeLevel::BuiltIn)
                    .set("font", builtin_font)
                    .build(),
            )
            .push(
                DefaultsScope::builder(ScopeLevel::Chart)
                    .set("font", chart_font)
                    .build(),
            )
            .build()
            .unwrap();

        let mut item = OptionStore::new();
        item.nested_mut("font").set("weight", "bold");

        let font = cascade.lookup().with_item(&item).nested("font");
        assert_eq!(font.get("size", 0.0), 14.0);
        assert_eq!(font.get("family", String::new()), "sans-serif");
        assert_eq!(font.get("weight", String::new()), "bold");
        assert_eq!(font.value_type("lineHeight"), ValueType::Undefined);
    }

    #[test]
    fn shorthand_values_expand_into_nested_containers() {
        let mut sides = OptionStore::new();
        sides.set("top", 4.0);
        sides.set("left", 4.0);
        let cascade = Cascade::builder()
            .push(
                DefaultsScope::builder(ScopeLevel::BuiltIn)
                    .set("padding", sides)
                    .build(),
            )
            .build()
            .unwrap();
        let expand = |value: &Value| {
            let n = value.as_f64()?;
            let mut store = OptionStore::new();
            store.set("top", n);
            store.set("left", n);
            Some(store)
        };

        let mut item = OptionStore::new();
        item.set("padding", 10.0);
        let lookup = cascade.lookup().with_item(&item);
        assert_eq!(
            lookup.nested("padding").get("top", 0.0),
            4.0,
            "plain merge skips the number"
        );
        let padding = lookup.nested_with("padding", expand);
        assert_eq!(padding.get("top", 0.0), 10.0);
        assert_eq!(padding.get("left", 0.0), 10.0);
    }

    #[test]
    fn nested_callbacks_come_from_the_first_defining_level() {
        let handle = CallbackHandle::new(0_u8);
        let mut plugin_listeners = OptionStore::new();
        plugin_listeners.set("click", handle.clone());
        plugin_listeners.set("leave", handle.clone());
        let cascade = Cascade::builder()
            .push(
                DefaultsScope::builder(ScopeLevel::Plugin)
                    .set("listeners", plugin_listeners)
                    .build(),
            )
            .build()
            .unwrap();

        let mut item = OptionStore::new();
        item.nested_mut("listeners").set("leave", Value::Null);
        let lookup = cascade.lookup().with_item(&item);
        assert_eq!(lookup.nested_callback("listeners", "click"), Some(&handle));
        assert_eq!(lookup.nested_callback("listeners", "leave"), None);
        assert_eq!(lookup.nested_callback("listeners", "enter"), None);
    }

    #[test]
    fn replacing_a_scope_leaves_the_original_untouched() {
        let cascade = full_cascade();
        let updated = cascade.with_scope(scope(ScopeLevel::Global, &[("b", 9.0)]));
        assert_eq!(cascade.resolve_default("b"), Value::Number(2.0));
        assert_eq!(updated.resolve_default("b"), Value::Number(9.0));
        assert_eq!(updated.resolve_default("c"), Value::Number(3.0));
        assert_eq!(updated.scopes().count(), 4);
    }
}
