// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label font.

use understory_option::{FromValue, OptionStore, Value};
use understory_scriptable::ScriptValue;

use crate::enums::{FontStyle, FontWeight};

const FAMILY: &str = "family";
const SIZE: &str = "size";
const STYLE: &str = "style";
const WEIGHT: &str = "weight";
const LINE_HEIGHT: &str = "lineHeight";

/// Font of a label.
///
/// Unset fields inherit from the defaults: a font set on a label only needs
/// the fields it changes.
///
/// # Example
///
/// ```rust
/// use understory_datalabels::{Font, FontWeight};
///
/// let font = Font::new().with_size(16.0).with_weight(FontWeight::Bold);
/// let store = font.to_store();
/// assert_eq!(store.get("size", 0.0), 16.0);
/// assert!(!store.has("family"));
/// assert_eq!(Font::from_store(&store), font);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Font {
    /// Font family, as a CSS font-family list.
    pub family: Option<String>,
    /// Size in pixels.
    pub size: Option<f64>,
    /// Style.
    pub style: Option<FontStyle>,
    /// Weight.
    pub weight: Option<FontWeight>,
    /// Line height, as a multiple of the size.
    pub line_height: Option<f64>,
}

impl Font {
    /// Creates a font with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the family.
    #[must_use]
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the style.
    #[must_use]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets the line height.
    #[must_use]
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Returns the nested container holding the set fields.
    #[must_use]
    pub fn to_store(&self) -> OptionStore {
        let mut store = OptionStore::new();
        if let Some(family) = &self.family {
            store.set(FAMILY, family.as_str());
        }
        if let Some(size) = self.size {
            store.set(SIZE, size);
        }
        if let Some(style) = self.style {
            store.set(STYLE, style);
        }
        if let Some(weight) = self.weight {
            store.set(WEIGHT, weight);
        }
        if let Some(line_height) = self.line_height {
            store.set(LINE_HEIGHT, line_height);
        }
        store
    }

    /// Reads a font from its nested container. Malformed fields are unset.
    #[must_use]
    pub fn from_store(store: &OptionStore) -> Self {
        let field = |key| store.value(key);
        Self {
            family: field(FAMILY).and_then(String::from_value),
            size: field(SIZE).and_then(f64::from_value),
            style: field(STYLE).and_then(FontStyle::from_value),
            weight: field(WEIGHT).and_then(FontWeight::from_value),
            line_height: field(LINE_HEIGHT).and_then(f64::from_value),
        }
    }
}

impl From<Font> for Value {
    fn from(font: Font) -> Self {
        Self::Object(font.to_store())
    }
}

impl FromValue for Font {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_store)
    }
}

impl ScriptValue for Font {
    type Output = Option<Self>;
    const NESTED: bool = true;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.map(Value::from)
    }
}
