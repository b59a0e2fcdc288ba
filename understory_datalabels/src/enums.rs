// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyword option values.

use understory_option::{FromValue, Value};
use understory_scriptable::ScriptValue;

macro_rules! keywords {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $keyword:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Returns the engine keyword.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $keyword, )+
                }
            }

            /// Parses an engine keyword.
            #[must_use]
            pub fn parse(keyword: &str) -> Option<Self> {
                match keyword {
                    $( $keyword => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Self::from(value.as_str())
            }
        }

        impl FromValue for $name {
            fn from_value(value: &Value) -> Option<Self> {
                value.as_str().and_then($name::parse)
            }
        }

        impl ScriptValue for $name {
            type Output = Option<Self>;

            fn coerce(output: Self::Output) -> Option<Value> {
                output.map(Value::from)
            }
        }
    };
}

keywords! {
    /// Where a label sits relative to its anchor point.
    Anchor {
        /// The element center.
        Center => "center",
        /// The lowest element boundary.
        Start => "start",
        /// The highest element boundary.
        End => "end",
    }
}

keywords! {
    /// Horizontal alignment of multi-line label text.
    TextAlign {
        /// Text start, following the writing direction.
        Start => "start",
        /// Centered.
        Center => "center",
        /// Text end, following the writing direction.
        End => "end",
        /// Left.
        Left => "left",
        /// Right.
        Right => "right",
    }
}

keywords! {
    /// Font style.
    FontStyle {
        /// Upright.
        Normal => "normal",
        /// Italic.
        Italic => "italic",
        /// Oblique.
        Oblique => "oblique",
    }
}

/// Position of a label relative to its anchor point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Align {
    /// Centered on the anchor.
    Center,
    /// Before the anchor, along the element direction.
    Start,
    /// After the anchor, along the element direction.
    End,
    /// Right of the anchor.
    Right,
    /// Below the anchor.
    Bottom,
    /// Left of the anchor.
    Left,
    /// Above the anchor.
    Top,
    /// At an angle, in degrees clockwise from the right.
    Degrees(f64),
}

impl Align {
    /// Returns the engine keyword, or `None` for [`Align::Degrees`].
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        Some(match self {
            Self::Center => "center",
            Self::Start => "start",
            Self::End => "end",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Top => "top",
            Self::Degrees(_) => return None,
        })
    }

    /// Parses an engine keyword.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "center" => Self::Center,
            "start" => Self::Start,
            "end" => Self::End,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "top" => Self::Top,
            _ => return None,
        })
    }
}

impl From<Align> for Value {
    fn from(align: Align) -> Self {
        match align {
            Align::Degrees(degrees) => Self::Number(degrees),
            keyword => keyword.keyword().map_or(Self::Null, Self::from),
        }
    }
}

impl FromValue for Align {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(keyword) => Self::parse(keyword),
            Value::Number(degrees) if degrees.is_finite() => Some(Self::Degrees(*degrees)),
            _ => None,
        }
    }
}

impl ScriptValue for Align {
    type Output = Option<Self>;

    fn coerce(output: Self::Output) -> Option<Value> {
        match output? {
            Self::Degrees(degrees) if !degrees.is_finite() => None,
            align => Some(align.into()),
        }
    }
}

/// Font weight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Normal weight.
    Normal,
    /// Bold.
    Bold,
    /// Lighter than the parent.
    Lighter,
    /// Bolder than the parent.
    Bolder,
    /// A numeric weight, 1 to 1000.
    Numeric(u16),
}

impl From<FontWeight> for Value {
    fn from(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Normal => Self::from("normal"),
            FontWeight::Bold => Self::from("bold"),
            FontWeight::Lighter => Self::from("lighter"),
            FontWeight::Bolder => Self::from("bolder"),
            FontWeight::Numeric(weight) => Self::Number(f64::from(weight)),
        }
    }
}

impl FromValue for FontWeight {
    fn from_value(value: &Value) -> Option<Self> {
        let numeric = match value {
            Value::String(s) => match s.as_str() {
                "normal" => return Some(Self::Normal),
                "bold" => return Some(Self::Bold),
                "lighter" => return Some(Self::Lighter),
                "bolder" => return Some(Self::Bolder),
                numeric => numeric.parse().ok(),
            },
            Value::Number(_) => u32::from_value(value).and_then(|w| u16::try_from(w).ok()),
            _ => None,
        };
        numeric
            .filter(|w| (1..=1000).contains(w))
            .map(Self::Numeric)
    }
}
