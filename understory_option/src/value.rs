// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option values.
//!
//! [`Value`] is the closed set of things an option can hold. Typed access goes
//! through [`FromValue`], which never panics: a value of the wrong shape simply
//! does not convert.

use std::fmt::Write as _;

use peniko::Color;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::callback::CallbackHandle;
use crate::store::OptionStore;

/// Key of the placeholder object that stands in for a callback in exported
/// native configuration.
pub const SCRIPTABLE_MARKER: &str = "__scriptable__";

/// A single option value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Explicit null.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string, including CSS color strings and keywords.
    String(String),
    /// A color literal.
    Color(Color),
    /// An array of values.
    Array(Vec<Self>),
    /// A nested container, owned by its parent.
    Object(OptionStore),
    /// A callback evaluated at render time.
    Callback(CallbackHandle),
}

/// The type of a stored option, as the rendering engine would report it.
///
/// Colors report as strings because the engine only ever sees them as CSS
/// strings; arrays, null and nested containers report as objects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No value is stored.
    Undefined,
    /// A string or color.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// Null, an array or a nested container.
    Object,
    /// A callback.
    Function,
}

impl ValueType {
    /// Returns the engine's name for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Function => "function",
        }
    }
}

impl Value {
    /// Returns the type of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null | Self::Array(_) | Self::Object(_) => ValueType::Object,
            Self::Bool(_) => ValueType::Boolean,
            Self::Number(_) => ValueType::Number,
            Self::String(_) | Self::Color(_) => ValueType::String,
            Self::Callback(_) => ValueType::Function,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for [`Value::Callback`].
    #[must_use]
    #[inline]
    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number, if this is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested container, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&OptionStore> {
        match self {
            Self::Object(store) => Some(store),
            _ => None,
        }
    }

    /// Returns the callback, if this is one.
    #[must_use]
    pub fn as_callback(&self) -> Option<&CallbackHandle> {
        match self {
            Self::Callback(handle) => Some(handle),
            _ => None,
        }
    }

    /// Truthiness as the rendering engine evaluates it.
    ///
    /// Null, `false`, zero, `NaN` and the empty string are falsy; everything
    /// else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Color(_) | Self::Array(_) | Self::Object(_) | Self::Callback(_) => true,
        }
    }

    /// The default string conversion the rendering engine applies to a value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_option::Value;
    ///
    /// assert_eq!(Value::Number(42.0).display_string(), "42");
    /// assert_eq!(Value::Number(0.5).display_string(), "0.5");
    /// assert_eq!(Value::Null.display_string(), "null");
    /// assert_eq!(
    ///     Value::Array(vec![Value::Number(1.0), Value::from("a")]).display_string(),
    ///     "1,a"
    /// );
    /// ```
    #[must_use]
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::from("null"),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_string(*n),
            Self::String(s) => s.clone(),
            Self::Color(c) => css_string(*c),
            Self::Array(items) => {
                let mut out = String::new();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if !item.is_null() {
                        out.push_str(&item.display_string());
                    }
                }
                out
            }
            Self::Object(_) => String::from("[object Object]"),
            Self::Callback(_) => String::from("function"),
        }
    }

    /// Converts a native (JSON) value.
    ///
    /// Nested objects become nested containers.
    #[must_use]
    pub fn from_native(native: &serde_json::Value) -> Self {
        match native {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => {
                Self::Array(items.iter().map(Self::from_native).collect())
            }
            serde_json::Value::Object(_) => Self::Object(OptionStore::from_native(native)),
        }
    }

    /// Exports the value as a native (JSON) value.
    ///
    /// Only [`OptionStore`] entries export callbacks, as
    /// `{"__scriptable__": "<key>"}` placeholders. A callback anywhere else
    /// has no key to be called back by and exports as null.
    #[must_use]
    pub fn to_native(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn number_string(n: f64) -> String {
    if n.is_nan() {
        String::from("NaN")
    } else if n.is_infinite() {
        String::from(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        n.to_string()
    }
}

/// Parses a CSS color string (`"#ff0000"`, `"rgb(0, 0, 255)"`, `"red"`, ...).
///
/// Returns `None` if the string is not a color.
#[must_use]
pub fn parse_color(css: &str) -> Option<Color> {
    let parsed = csscolorparser::parse(css).ok()?;
    let [r, g, b, a] = parsed.to_rgba8();
    Some(Color::from_rgba8(r, g, b, a))
}

/// Formats a color as the `rgba(r, g, b, a)` string handed to the engine.
#[must_use]
pub fn css_string(color: Color) -> String {
    let rgba = color.to_rgba8();
    let alpha = (f64::from(rgba.a) / 255.0 * 1000.0).round() / 1000.0;
    let mut out = String::with_capacity(24);
    let _ = write!(out, "rgba({}, {}, {}, {alpha})", rgba.r, rgba.g, rgba.b);
    out
}

fn same_color(a: Color, b: Color) -> bool {
    let (a, b) = (a.to_rgba8(), b.to_rgba8());
    (a.r, a.g, a.b, a.a) == (b.r, b.g, b.b, b.a)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Color(a), Self::Color(b)) => same_color(*a, *b),
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Callback(a), Self::Callback(b)) => a == b,
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Color(c) => serializer.serialize_str(&css_string(*c)),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(store) => store.serialize(serializer),
            Self::Callback(handle) => {
                tracing::debug!(
                    callback = handle.type_name(),
                    "callback outside an option key exported as null"
                );
                serializer.serialize_unit()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<OptionStore> for Value {
    fn from(value: OptionStore) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl From<CallbackHandle> for Value {
    fn from(value: CallbackHandle) -> Self {
        Self::Callback(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Typed extraction from a [`Value`].
///
/// Conversions are strict about shape (a string is never read as a number)
/// and return `None` instead of failing.
pub trait FromValue: Sized {
    /// Extracts `Self` from `value`, or returns `None` if the shape does not match.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        let n = value.as_f64()?;
        if n.is_finite() && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "range checked above, fractions truncate like the engine's integer reads"
            )]
            let n = n as Self;
            Some(n)
        } else {
            None
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Option<Self> {
        let n = value.as_f64()?;
        if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) {
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "range checked above, fractions truncate like the engine's integer reads"
            )]
            let n = n as Self;
            Some(n)
        } else {
            None
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Color(c) => Some(css_string(*c)),
            _ => None,
        }
    }
}

impl FromValue for Color {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Color(c) => Some(*c),
            Value::String(s) => parse_color(s),
            _ => None,
        }
    }
}

impl FromValue for OptionStore {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}
