// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label padding.

use kurbo::Insets;
use understory_option::{FromValue, OptionStore, Value};
use understory_scriptable::ScriptValue;

const TOP: &str = "top";
const RIGHT: &str = "right";
const BOTTOM: &str = "bottom";
const LEFT: &str = "left";

/// Space between a label's text and its border, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Padding {
    /// Space above the text.
    pub top: f64,
    /// Space right of the text.
    pub right: f64,
    /// Space below the text.
    pub bottom: f64,
    /// Space left of the text.
    pub left: f64,
}

impl Padding {
    /// Creates padding with every side set.
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates the same padding on all four sides.
    #[must_use]
    pub const fn uniform(padding: f64) -> Self {
        Self::new(padding, padding, padding, padding)
    }

    /// Returns the padding as insets.
    #[must_use]
    pub fn to_insets(self) -> Insets {
        Insets::new(self.left, self.top, self.right, self.bottom)
    }

    /// Returns the nested container for this padding.
    #[must_use]
    pub fn to_store(self) -> OptionStore {
        let mut store = OptionStore::new();
        store.set(TOP, self.top);
        store.set(RIGHT, self.right);
        store.set(BOTTOM, self.bottom);
        store.set(LEFT, self.left);
        store
    }

    /// Reads padding from its nested container. Missing sides are zero.
    #[must_use]
    pub fn from_store(store: &OptionStore) -> Self {
        Self::new(
            store.get(TOP, 0.0),
            store.get(RIGHT, 0.0),
            store.get(BOTTOM, 0.0),
            store.get(LEFT, 0.0),
        )
    }
}

impl From<Insets> for Padding {
    fn from(insets: Insets) -> Self {
        Self::new(insets.y0, insets.x1, insets.y1, insets.x0)
    }
}

impl From<Padding> for Value {
    fn from(padding: Padding) -> Self {
        Self::Object(padding.to_store())
    }
}

impl FromValue for Padding {
    /// Accepts a nested container, or a single number for all sides.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(store) => Some(Self::from_store(store)),
            Value::Number(n) => Some(Self::uniform(*n)),
            _ => None,
        }
    }
}

impl ScriptValue for Padding {
    type Output = Option<Self>;
    const NESTED: bool = true;

    fn coerce(output: Self::Output) -> Option<Value> {
        output.map(Value::from)
    }

    fn expand(value: &Value) -> Option<OptionStore> {
        value.as_f64().map(|n| Self::uniform(n).to_store())
    }
}
