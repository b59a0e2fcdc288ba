// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed scriptable option descriptors.
//!
//! A [`Scriptable<T>`] names an option and fixes the type its callbacks
//! return. The [`ScriptValue`] implementation of `T` decides how a callback's
//! result becomes a [`Value`], and when it is unusable.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use understory_option::{CallbackHandle, Color, FromValue, Key, OptionStore, Value, parse_color};

use crate::context::Context;

/// Signature of a scriptable callback returning `R`.
///
/// The second argument is the value the option would have without the
/// callback: its default. Formatters receive the raw data point instead.
pub type ScriptFn<R> = dyn Fn(&Context<'_>, &Value) -> R + Send + Sync;

/// A shared scriptable callback returning `R`.
pub type Callback<R> = Arc<ScriptFn<R>>;

/// How callback results of an option type turn into option values.
pub trait ScriptValue: 'static {
    /// What callbacks for this type return.
    type Output: 'static;

    /// Nested options resolve by merging their fields across every level.
    const NESTED: bool = false;

    /// Converts a callback result, or returns `None` to use the default.
    fn coerce(output: Self::Output) -> Option<Value>;

    /// Normalizes a default value before it is returned.
    fn normalize(value: Value) -> Value {
        value
    }

    /// Expands a shorthand literal of a nested option into its container.
    fn expand(value: &Value) -> Option<OptionStore> {
        let _ = value;
        None
    }
}

/// A scriptable option of type `T`.
///
/// # Example
///
/// ```rust
/// use understory_option::{OptionStore, ValueType};
/// use understory_scriptable::Scriptable;
///
/// const ROTATION: Scriptable<f64> = Scriptable::new("rotation");
///
/// let mut options = OptionStore::new();
/// ROTATION.set_callback(&mut options, |ctx, _| {
///     ctx.data_index().map(|i| i as f64 * 10.0)
/// });
/// assert_eq!(options.value_type("rotation"), ValueType::Function);
/// assert!(ROTATION.clear_callback(&mut options));
/// assert!(!options.has("rotation"));
/// ```
pub struct Scriptable<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Scriptable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Scriptable<T> {}

impl<T> fmt::Debug for Scriptable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scriptable").field(&self.name).finish()
    }
}

impl<T> Scriptable<T> {
    /// Creates a descriptor for the option called `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the engine name of the option.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the option key.
    #[must_use]
    #[inline]
    pub const fn key(self) -> Key {
        Key::new(self.name)
    }
}

impl<T: ScriptValue> Scriptable<T> {
    /// Wraps a callback into a handle that can be stored anywhere options
    /// are stored, including default scopes.
    #[must_use]
    pub fn handle<F>(callback: F) -> CallbackHandle
    where
        F: Fn(&Context<'_>, &Value) -> T::Output + Send + Sync + 'static,
    {
        let callback: Callback<T::Output> = Arc::new(callback);
        CallbackHandle::new(callback)
    }

    /// Recovers the typed callback from a handle.
    ///
    /// Returns `None` if the handle was made for another option type.
    #[must_use]
    pub fn callback_of(handle: &CallbackHandle) -> Option<&Callback<T::Output>> {
        handle.downcast_ref()
    }

    /// Stores a callback for this option, replacing any literal.
    pub fn set_callback<F>(self, store: &mut OptionStore, callback: F)
    where
        F: Fn(&Context<'_>, &Value) -> T::Output + Send + Sync + 'static,
    {
        store.set_callback(self.key(), Some(Self::handle(callback)));
    }

    /// Returns the callback stored for this option.
    #[must_use]
    pub fn callback(self, store: &OptionStore) -> Option<Callback<T::Output>> {
        store
            .callback(self.name)
            .and_then(Self::callback_of)
            .cloned()
    }

    /// Removes the stored callback. A literal under the same key is kept.
    ///
    /// Returns `true` if a callback was removed.
    pub fn clear_callback(self, store: &mut OptionStore) -> bool {
        store.callback(self.name).is_some() && store.remove(self.name)
    }
}

impl<T: ScriptValue + Into<Value>> Scriptable<T> {
    /// Stores a literal for this option, replacing any callback.
    pub fn set(self, store: &mut OptionStore, value: T) {
        store.set(self.key(), value);
    }
}

impl ScriptValue for bool {
    type Output = Option<Self>;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.map(Value::Bool)
    }
}

impl ScriptValue for f64 {
    type Output = Option<Self>;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.filter(|n| n.is_finite()).map(Value::Number)
    }
}

impl ScriptValue for u32 {
    type Output = Option<Self>;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.map(Value::from)
    }
}

impl ScriptValue for String {
    type Output = Option<Self>;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.map(Value::String)
    }
}

/// A number that must not be negative (widths, radii, opacity).
///
/// Negative or non-finite callback results fall back to the default.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct NonNegative(f64);

impl NonNegative {
    /// Returns `value` if it is finite and not negative.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    /// Returns the number.
    #[must_use]
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<NonNegative> for Value {
    fn from(value: NonNegative) -> Self {
        Self::Number(value.0)
    }
}

impl FromValue for NonNegative {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64().and_then(Self::new)
    }
}

impl ScriptValue for NonNegative {
    type Output = Option<f64>;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.and_then(Self::new).map(Value::from)
    }
}

/// A color, either as a CSS string or as a color literal.
#[derive(Clone, Debug)]
pub enum ColorValue {
    /// A CSS color string, passed to the engine as-is.
    Css(String),
    /// A color literal.
    Rgba(Color),
}

impl ColorValue {
    /// Returns the color, parsing CSS strings.
    #[must_use]
    pub fn to_color(&self) -> Option<Color> {
        match self {
            Self::Css(css) => parse_color(css),
            Self::Rgba(color) => Some(*color),
        }
    }
}

impl PartialEq for ColorValue {
    fn eq(&self, other: &Self) -> bool {
        Value::from(self.clone()) == Value::from(other.clone())
    }
}

impl From<&str> for ColorValue {
    fn from(css: &str) -> Self {
        Self::Css(css.into())
    }
}

impl From<String> for ColorValue {
    fn from(css: String) -> Self {
        Self::Css(css)
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        Self::Rgba(color)
    }
}

impl From<ColorValue> for Value {
    fn from(color: ColorValue) -> Self {
        match color {
            ColorValue::Css(css) => Self::String(css),
            ColorValue::Rgba(color) => Self::Color(color),
        }
    }
}

impl FromValue for ColorValue {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(css) => Some(Self::Css(css.clone())),
            Value::Color(color) => Some(Self::Rgba(*color)),
            _ => None,
        }
    }
}

impl ScriptValue for ColorValue {
    type Output = Option<Self>;

    fn coerce(output: Self::Output) -> Option<Value> {
        match output? {
            Self::Css(css) if parse_color(&css).is_none() => {
                tracing::debug!(css = %css, "callback returned a string that is not a color");
                None
            }
            color => Some(color.into()),
        }
    }
}

/// Visibility of an element: shown, hidden, or decided by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Display {
    /// Always drawn.
    Shown,
    /// Never drawn.
    Hidden,
    /// Hidden when it would overlap another element.
    Auto,
}

/// The engine's keyword for [`Display::Auto`].
pub const AUTO: &str = "auto";

impl From<bool> for Display {
    fn from(shown: bool) -> Self {
        if shown { Self::Shown } else { Self::Hidden }
    }
}

impl From<Display> for Value {
    fn from(display: Display) -> Self {
        match display {
            Display::Shown => Self::Bool(true),
            Display::Hidden => Self::Bool(false),
            Display::Auto => Self::from(AUTO),
        }
    }
}

impl FromValue for Display {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some((*b).into()),
            Value::String(s) if s == AUTO => Some(Self::Auto),
            _ => None,
        }
    }
}

impl ScriptValue for Display {
    /// Display callbacks may return anything: booleans and `"auto"` are taken
    /// as-is, null means the default, and everything else is read by
    /// truthiness.
    type Output = Value;

    fn coerce(output: Self::Output) -> Option<Value> {
        match output {
            Value::Null => None,
            value => Some(Self::normalize(value)),
        }
    }

    fn normalize(value: Value) -> Value {
        match value {
            Value::Null | Value::Bool(_) => value,
            Value::String(s) if s == AUTO => Value::String(s),
            other => {
                // Lenient: any truthy value counts as shown.
                tracing::debug!(
                    kind = other.value_type().as_str(),
                    "coercing display value by truthiness"
                );
                Value::Bool(other.is_truthy())
            }
        }
    }
}

/// Label text formatting.
///
/// Formatter callbacks receive the raw data point as their second argument
/// and return the text to draw; `None` falls back to the raw value's default
/// string conversion.
#[derive(Copy, Clone, Debug)]
pub struct Formatter;

impl ScriptValue for Formatter {
    type Output = Option<String>;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.map(Value::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_replaces_callback_and_back() {
        const OFFSET: Scriptable<f64> = Scriptable::new("offset");
        let mut store = OptionStore::new();
        OFFSET.set_callback(&mut store, |_, _| Some(1.0));
        assert!(OFFSET.callback(&store).is_some());
        OFFSET.set(&mut store, 4.0);
        assert!(OFFSET.callback(&store).is_none());
        assert_eq!(store.get("offset", 0.0), 4.0);
        assert!(!OFFSET.clear_callback(&mut store));
        assert!(store.has("offset"));
    }

    #[test]
    fn handles_are_typed() {
        let handle = Scriptable::<bool>::handle(|_, _| Some(true));
        assert!(Scriptable::<bool>::callback_of(&handle).is_some());
        assert!(Scriptable::<f64>::callback_of(&handle).is_none());
    }

    #[test]
    fn numbers_must_be_finite() {
        assert_eq!(f64::coerce(Some(2.0)), Some(Value::Number(2.0)));
        assert_eq!(f64::coerce(Some(f64::NAN)), None);
        assert_eq!(f64::coerce(None), None);
    }

    #[test]
    fn non_negative_rejects_negative() {
        assert_eq!(NonNegative::coerce(Some(0.0)), Some(Value::Number(0.0)));
        assert_eq!(NonNegative::coerce(Some(-1.0)), None);
        assert_eq!(NonNegative::coerce(Some(f64::INFINITY)), None);
        assert_eq!(NonNegative::new(3.0).map(NonNegative::get), Some(3.0));
    }

    #[test]
    fn colors_must_parse() {
        assert_eq!(
            ColorValue::coerce(Some("#00ff00".into())),
            Some(Value::from("#00ff00"))
        );
        assert_eq!(ColorValue::coerce(Some("bright".into())), None);
        let literal = Color::from_rgba8(0, 0, 255, 255);
        assert_eq!(
            ColorValue::coerce(Some(literal.into())),
            Some(Value::Color(literal))
        );
        assert_eq!(
            ColorValue::from("red").to_color().map(|c| c.to_rgba8().r),
            Some(255)
        );
    }

    #[test]
    fn display_coercion() {
        assert_eq!(Display::coerce(Value::from("auto")), Some(Value::from("auto")));
        assert_eq!(Display::coerce(Value::Bool(false)), Some(Value::Bool(false)));
        assert_eq!(Display::coerce(Value::Null), None);
        assert_eq!(Display::coerce(Value::from(1.0)), Some(Value::Bool(true)));
        assert_eq!(Display::coerce(Value::from(0.0)), Some(Value::Bool(false)));
        assert_eq!(Display::coerce(Value::from("yes")), Some(Value::Bool(true)));
        assert_eq!(Display::coerce(Value::from("")), Some(Value::Bool(false)));
    }

    #[test]
    fn display_literals() {
        assert_eq!(Value::from(Display::Auto), Value::from("auto"));
        assert_eq!(Display::from_value(&Value::Bool(true)), Some(Display::Shown));
        assert_eq!(Display::from_value(&Value::from("auto")), Some(Display::Auto));
        assert_eq!(Display::from_value(&Value::from("maybe")), None);
    }
}
