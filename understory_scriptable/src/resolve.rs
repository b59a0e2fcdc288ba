// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-time resolution of scriptable options.
//!
//! Each resolution walks a small state machine:
//!
//! - **Literal**: no callback applies, the literal (or its default) is returned.
//! - **Callback pending**: a callback applies; an inconsistent context goes
//!   straight to fallback without running user code.
//! - **Invoking**: the callback runs with the context and the default value.
//! - **Coercing**: the result is converted; null or an unexpected shape falls back.
//! - **Fallback**: the option's default, ignoring the item's own value.

use understory_cascade::Lookup;
use understory_option::{OptionStore, Value};

use crate::context::Context;
use crate::scriptable::{Formatter, ScriptValue, Scriptable};

/// Which terminal state produced a resolved value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// The item's own literal.
    Literal,
    /// A default, because the item sets nothing.
    Default,
    /// A callback result.
    Callback,
    /// A default, because a callback could not be used.
    Fallback,
}

/// A resolved value and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// The value handed to the engine.
    pub value: Value,
    /// How it was obtained.
    pub source: Source,
}

/// Resolves scriptable options of one item.
///
/// # Example
///
/// ```rust
/// use understory_cascade::{Cascade, DefaultsScope, ScopeLevel};
/// use understory_option::{OptionStore, Value};
/// use understory_scriptable::{ChartHandle, ChartKind, Context, Resolver, Scriptable};
///
/// const OFFSET: Scriptable<f64> = Scriptable::new("offset");
///
/// let cascade = Cascade::builder()
///     .push(DefaultsScope::builder(ScopeLevel::BuiltIn).set("offset", 4.0).build())
///     .build()
///     .unwrap();
/// let chart = ChartHandle::new("chart", ChartKind::Bar).unwrap();
///
/// let mut item = OptionStore::new();
/// OFFSET.set_callback(&mut item, |ctx, default| {
///     let base = default.as_f64()?;
///     Some(base + ctx.data_index()? as f64)
/// });
///
/// let resolver = Resolver::new(cascade.lookup().with_item(&item));
/// let ctx = Context::new(&chart, Some(0), Some(2));
/// assert_eq!(resolver.resolve(OFFSET, &ctx), Value::Number(6.0));
///
/// // Without a data index the callback is not run.
/// let ctx = Context::new(&chart, Some(0), None);
/// assert_eq!(resolver.resolve(OFFSET, &ctx), Value::Number(4.0));
/// ```
#[derive(Debug)]
pub struct Resolver<'a> {
    lookup: Lookup<'a>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `lookup`.
    #[must_use]
    pub fn new(lookup: Lookup<'a>) -> Self {
        Self { lookup }
    }

    /// Returns the underlying lookup.
    #[must_use]
    #[inline]
    pub fn lookup(&self) -> &Lookup<'a> {
        &self.lookup
    }

    /// Resolves `option` for the element `ctx` points at.
    #[must_use]
    pub fn resolve<T: ScriptValue>(&self, option: Scriptable<T>, ctx: &Context<'_>) -> Value {
        self.resolve_traced(option, ctx).value
    }

    /// Resolves `option` and reports which state produced the value.
    #[must_use]
    pub fn resolve_traced<T: ScriptValue>(
        &self,
        option: Scriptable<T>,
        ctx: &Context<'_>,
    ) -> Resolved {
        let key = option.name();
        let Some(handle) = self.lookup.callback(key) else {
            let source = if self.lookup.item().is_some_and(|item| item.has(key)) {
                Source::Literal
            } else {
                Source::Default
            };
            return Resolved {
                value: T::normalize(self.literal(option)),
                source,
            };
        };

        if !ctx.is_consistent() {
            tracing::debug!(
                key,
                dataset_index = ?ctx.dataset_index(),
                data_index = ?ctx.data_index(),
                "inconsistent context, using default"
            );
            return self.fallback::<T>(key);
        }
        let Some(callback) = Scriptable::<T>::callback_of(handle) else {
            tracing::warn!(
                key,
                callback = handle.type_name(),
                "callback does not match the option type, using default"
            );
            return self.fallback::<T>(key);
        };

        let default = self.default_value::<T>(key);
        let ctx = match self.lookup.item() {
            Some(item) => ctx.with_options(item),
            None => *ctx,
        };
        tracing::trace!(
            key,
            dataset_index = ?ctx.dataset_index(),
            data_index = ?ctx.data_index(),
            "invoking scriptable option"
        );
        match T::coerce(callback(&ctx, &default)) {
            Some(Value::Object(result)) if T::NESTED => Resolved {
                value: Value::Object(merged(default, &result)),
                source: Source::Callback,
            },
            Some(value) => Resolved {
                value,
                source: Source::Callback,
            },
            None => {
                tracing::debug!(key, "callback returned no usable value, using default");
                Resolved {
                    value: default,
                    source: Source::Fallback,
                }
            }
        }
    }

    /// Produces the label text for the raw data point `raw`.
    ///
    /// Runs the formatter callback when one applies and the context is
    /// consistent; otherwise, or when the callback returns `None`, the raw
    /// value's default string conversion is used.
    #[must_use]
    pub fn format(&self, option: Scriptable<Formatter>, ctx: &Context<'_>, raw: &Value) -> String {
        if let Some(handle) = self.lookup.callback(option.name())
            && ctx.is_consistent()
            && let Some(callback) = Scriptable::<Formatter>::callback_of(handle)
        {
            let ctx = match self.lookup.item() {
                Some(item) => ctx.with_options(item),
                None => *ctx,
            };
            if let Some(text) = callback(&ctx, raw) {
                return text;
            }
        }
        raw.display_string()
    }

    /// Resolves `option` without running callbacks: the item's literal, or
    /// else its default.
    ///
    /// Nested options merge every level, with shorthand literals expanded.
    #[must_use]
    pub fn literal<T: ScriptValue>(&self, option: Scriptable<T>) -> Value {
        let key = option.name();
        if T::NESTED {
            Value::Object(self.lookup.nested_with(key, T::expand))
        } else {
            self.lookup.resolve(key)
        }
    }

    fn default_value<T: ScriptValue>(&self, key: &str) -> Value {
        let value = if T::NESTED {
            Value::Object(self.lookup.nested_with(key, T::expand))
        } else {
            self.lookup.resolve_default(key)
        };
        T::normalize(value)
    }

    fn fallback<T: ScriptValue>(&self, key: &str) -> Resolved {
        Resolved {
            value: self.default_value::<T>(key),
            source: Source::Fallback,
        }
    }
}

fn merged(default: Value, result: &OptionStore) -> OptionStore {
    let mut base = match default {
        Value::Object(base) => base,
        _ => OptionStore::new(),
    };
    base.merge_from(result);
    base
}
