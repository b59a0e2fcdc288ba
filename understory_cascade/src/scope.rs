// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default scopes.
//!
//! A [`DefaultsScope`] is an immutable set of default rules for one
//! [`ScopeLevel`]. Scopes are built once with [`DefaultsScopeBuilder`] and
//! shared between every cascade that uses them.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use understory_option::{Key, OptionStore, Value};

use crate::cascade::Lookup;
use crate::error::CascadeError;

/// The level a default scope applies at, lowest precedence first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeLevel {
    /// Hardcoded constants shipped with the plugin.
    BuiltIn,
    /// The engine's global defaults.
    Global,
    /// Global defaults of a plugin.
    Plugin,
    /// Defaults of one chart type or chart instance.
    Chart,
    /// Defaults attached to a single options item.
    Item,
}

impl ScopeLevel {
    /// Returns a lowercase name for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuiltIn => "built-in",
            Self::Global => "global",
            Self::Plugin => "plugin",
            Self::Chart => "chart",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function deriving a default from the other resolved options.
pub type ComputeFn = dyn Fn(&Lookup<'_>) -> Option<Value> + Send + Sync;

/// How a scope provides the default of one option.
#[derive(Clone)]
pub enum DefaultRule {
    /// A fixed value. A [`Value::Callback`] here is a default callback: it is
    /// evaluated at render time but never used as a fallback literal.
    Constant(Value),
    /// Whatever the named sibling option resolves to.
    SameAs(Key),
    /// A value derived from the other options. Returning `None` defers to
    /// lower scopes.
    Computed(Arc<ComputeFn>),
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::SameAs(key) => f.debug_tuple("SameAs").field(key).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// An immutable set of default rules for one level.
///
/// # Example
///
/// ```rust
/// use understory_cascade::{DefaultRule, DefaultsScope, ScopeLevel};
///
/// let global = DefaultsScope::builder(ScopeLevel::Global)
///     .set("color", "#666")
///     .same_as("textStrokeColor", "color")
///     .build();
///
/// assert_eq!(global.level(), ScopeLevel::Global);
/// assert!(matches!(global.get("textStrokeColor"), Some(DefaultRule::SameAs(_))));
/// assert!(global.get("opacity").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct DefaultsScope {
    level: ScopeLevel,
    rules: IndexMap<Key, DefaultRule>,
}

impl DefaultsScope {
    /// Starts building a scope for `level`.
    #[must_use]
    pub fn builder(level: ScopeLevel) -> DefaultsScopeBuilder {
        DefaultsScopeBuilder::new(level)
    }

    /// Creates an empty scope.
    #[must_use]
    pub fn empty(level: ScopeLevel) -> Self {
        Self {
            level,
            rules: IndexMap::new(),
        }
    }

    /// Loads constant defaults from a native (JSON) object.
    ///
    /// Nested objects become nested defaults (`font`, `padding`).
    pub fn from_native(
        level: ScopeLevel,
        native: &serde_json::Value,
    ) -> Result<Self, CascadeError> {
        if !native.is_object() {
            return Err(CascadeError::NotAnObject {
                level,
                found: json_kind(native),
            });
        }
        Ok(Self::builder(level)
            .extend_from_store(&OptionStore::from_native(native))
            .build())
    }

    /// Returns the level of this scope.
    #[must_use]
    #[inline]
    pub fn level(&self) -> ScopeLevel {
        self.level
    }

    /// Returns the rule for `key`, if this scope defines one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DefaultRule> {
        self.rules.get(key)
    }

    /// Returns `true` if this scope defines a rule for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Returns the keys this scope defines.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.rules.keys()
    }

    /// Returns the number of rules.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if this scope defines nothing.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn json_kind(native: &serde_json::Value) -> &'static str {
    match native {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Builder for [`DefaultsScope`].
///
/// Later rules for the same key replace earlier ones.
#[derive(Debug)]
pub struct DefaultsScopeBuilder {
    level: ScopeLevel,
    rules: IndexMap<Key, DefaultRule>,
}

impl DefaultsScopeBuilder {
    /// Creates a builder for `level`.
    #[must_use]
    pub fn new(level: ScopeLevel) -> Self {
        Self {
            level,
            rules: IndexMap::new(),
        }
    }

    /// Adds a constant default.
    #[must_use]
    pub fn set(self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.rule(key, DefaultRule::Constant(value.into()))
    }

    /// Makes `key` default to whatever `sibling` resolves to.
    #[must_use]
    pub fn same_as(self, key: impl Into<Key>, sibling: impl Into<Key>) -> Self {
        self.rule(key, DefaultRule::SameAs(sibling.into()))
    }

    /// Adds a computed default.
    #[must_use]
    pub fn computed<F>(self, key: impl Into<Key>, compute: F) -> Self
    where
        F: Fn(&Lookup<'_>) -> Option<Value> + Send + Sync + 'static,
    {
        self.rule(key, DefaultRule::Computed(Arc::new(compute)))
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule(mut self, key: impl Into<Key>, rule: DefaultRule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Adds every entry of `store` as a constant default.
    #[must_use]
    pub fn extend_from_store(mut self, store: &OptionStore) -> Self {
        for (key, value) in store.iter() {
            self.rules
                .insert(key.clone(), DefaultRule::Constant(value.clone()));
        }
        self
    }

    /// Builds the immutable scope.
    #[must_use]
    pub fn build(self) -> DefaultsScope {
        DefaultsScope {
            level: self.level,
            rules: self.rules,
        }
    }
}
