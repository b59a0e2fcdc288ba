// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-label option descriptors.
//!
//! Every option is a [`Scriptable`] constant: it can hold a literal or a
//! callback, and resolves through the same machinery as every other option.

use understory_cascade::Lookup;
use understory_option::{SCRIPTABLE_MARKER, Value};
use understory_scriptable::{
    ColorValue, Context, Display, Formatter, NonNegative, Resolver, ScriptValue, Scriptable,
};

use crate::enums::{Align, Anchor, TextAlign};
use crate::event::Event;
use crate::font::Font;
use crate::padding::Padding;

/// Position of the label relative to its anchor point.
pub const ALIGN: Scriptable<Align> = Scriptable::new("align");
/// Anchor point of the label on its element.
pub const ANCHOR: Scriptable<Anchor> = Scriptable::new("anchor");
/// Background fill.
pub const BACKGROUND_COLOR: Scriptable<ColorValue> = Scriptable::new("backgroundColor");
/// Border color.
pub const BORDER_COLOR: Scriptable<ColorValue> = Scriptable::new("borderColor");
/// Border corner radius.
pub const BORDER_RADIUS: Scriptable<NonNegative> = Scriptable::new("borderRadius");
/// Border width.
pub const BORDER_WIDTH: Scriptable<u32> = Scriptable::new("borderWidth");
/// Keep labels inside the chart area.
pub const CLAMP: Scriptable<bool> = Scriptable::new("clamp");
/// Clip labels to the chart area.
pub const CLIP: Scriptable<bool> = Scriptable::new("clip");
/// Text color.
pub const COLOR: Scriptable<ColorValue> = Scriptable::new("color");
/// Visibility.
pub const DISPLAY: Scriptable<Display> = Scriptable::new("display");
/// Text font.
pub const FONT: Scriptable<Font> = Scriptable::new("font");
/// Label text.
pub const FORMATTER: Scriptable<Formatter> = Scriptable::new("formatter");
/// Distance to the anchor point, in pixels.
pub const OFFSET: Scriptable<f64> = Scriptable::new("offset");
/// Opacity, from 0 to 1.
pub const OPACITY: Scriptable<NonNegative> = Scriptable::new("opacity");
/// Space around the text.
pub const PADDING: Scriptable<Padding> = Scriptable::new("padding");
/// Clockwise rotation, in degrees.
pub const ROTATION: Scriptable<f64> = Scriptable::new("rotation");
/// Alignment of multi-line text.
pub const TEXT_ALIGN: Scriptable<TextAlign> = Scriptable::new("textAlign");
/// Text stroke color.
pub const TEXT_STROKE_COLOR: Scriptable<ColorValue> = Scriptable::new("textStrokeColor");
/// Text stroke width.
pub const TEXT_STROKE_WIDTH: Scriptable<u32> = Scriptable::new("textStrokeWidth");
/// Text shadow blur radius.
pub const TEXT_SHADOW_BLUR: Scriptable<f64> = Scriptable::new("textShadowBlur");
/// Text shadow color.
pub const TEXT_SHADOW_COLOR: Scriptable<ColorValue> = Scriptable::new("textShadowColor");

/// Key of the nested container holding event listeners.
pub const LISTENERS: &str = "listeners";

/// Names of every scriptable option.
pub const NAMES: [&str; 21] = [
    ALIGN.name(),
    ANCHOR.name(),
    BACKGROUND_COLOR.name(),
    BORDER_COLOR.name(),
    BORDER_RADIUS.name(),
    BORDER_WIDTH.name(),
    CLAMP.name(),
    CLIP.name(),
    COLOR.name(),
    DISPLAY.name(),
    FONT.name(),
    FORMATTER.name(),
    OFFSET.name(),
    OPACITY.name(),
    PADDING.name(),
    ROTATION.name(),
    TEXT_ALIGN.name(),
    TEXT_STROKE_COLOR.name(),
    TEXT_STROKE_WIDTH.name(),
    TEXT_SHADOW_BLUR.name(),
    TEXT_SHADOW_COLOR.name(),
];

/// Applies `$apply` to the descriptor called `$key`, or yields `None` for
/// unknown names.
macro_rules! by_name {
    ($key:expr, $apply:ident($($arg:expr),*)) => {
        match $key {
            "align" => Some($apply(ALIGN, $($arg),*)),
            "anchor" => Some($apply(ANCHOR, $($arg),*)),
            "backgroundColor" => Some($apply(BACKGROUND_COLOR, $($arg),*)),
            "borderColor" => Some($apply(BORDER_COLOR, $($arg),*)),
            "borderRadius" => Some($apply(BORDER_RADIUS, $($arg),*)),
            "borderWidth" => Some($apply(BORDER_WIDTH, $($arg),*)),
            "clamp" => Some($apply(CLAMP, $($arg),*)),
            "clip" => Some($apply(CLIP, $($arg),*)),
            "color" => Some($apply(COLOR, $($arg),*)),
            "display" => Some($apply(DISPLAY, $($arg),*)),
            "font" => Some($apply(FONT, $($arg),*)),
            "formatter" => Some($apply(FORMATTER, $($arg),*)),
            "offset" => Some($apply(OFFSET, $($arg),*)),
            "opacity" => Some($apply(OPACITY, $($arg),*)),
            "padding" => Some($apply(PADDING, $($arg),*)),
            "rotation" => Some($apply(ROTATION, $($arg),*)),
            "textAlign" => Some($apply(TEXT_ALIGN, $($arg),*)),
            "textStrokeColor" => Some($apply(TEXT_STROKE_COLOR, $($arg),*)),
            "textStrokeWidth" => Some($apply(TEXT_STROKE_WIDTH, $($arg),*)),
            "textShadowBlur" => Some($apply(TEXT_SHADOW_BLUR, $($arg),*)),
            "textShadowColor" => Some($apply(TEXT_SHADOW_COLOR, $($arg),*)),
            _ => None,
        }
    };
}

/// Resolves the option called `key`, or returns `None` for unknown names.
///
/// The formatter resolves to the label text for the element `ctx` points at.
pub(crate) fn resolve_by_name(
    lookup: Lookup<'_>,
    key: &str,
    ctx: &Context<'_>,
) -> Option<Value> {
    let resolver = Resolver::new(lookup);
    if key == FORMATTER.name() {
        let raw = ctx.raw_value().unwrap_or_default();
        return Some(Value::String(resolver.format(FORMATTER, ctx, &raw)));
    }
    by_name!(key, resolve_one(&resolver, ctx))
}

fn resolve_one<T: ScriptValue>(
    option: Scriptable<T>,
    resolver: &Resolver<'_>,
    ctx: &Context<'_>,
) -> Value {
    resolver.resolve(option, ctx)
}

/// Exports every option as the engine receives it: defaults merged in, and a
/// `{"__scriptable__": "<key>"}` placeholder wherever a callback applies,
/// whichever level defines it.
pub(crate) fn merged_native(lookup: Lookup<'_>) -> serde_json::Value {
    let resolver = Resolver::new(lookup);
    let mut native = serde_json::Map::new();
    for key in NAMES {
        if let Some(value) = by_name!(key, export_one(&resolver)) {
            native.insert(key.to_owned(), value);
        }
    }
    let listeners: serde_json::Map<_, _> = Event::ALL
        .into_iter()
        .filter(|event| {
            resolver
                .lookup()
                .nested_callback(LISTENERS, event.as_str())
                .is_some()
        })
        .map(|event| (event.as_str().to_owned(), placeholder(event.as_str())))
        .collect();
    if !listeners.is_empty() {
        native.insert(LISTENERS.to_owned(), serde_json::Value::Object(listeners));
    }
    serde_json::Value::Object(native)
}

fn export_one<T: ScriptValue>(option: Scriptable<T>, resolver: &Resolver<'_>) -> serde_json::Value {
    let key = option.name();
    if resolver.lookup().callback(key).is_some() {
        return placeholder(key);
    }
    T::normalize(resolver.literal(option)).to_native()
}

fn placeholder(key: &str) -> serde_json::Value {
    serde_json::json!({ SCRIPTABLE_MARKER: key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_cascade::Cascade;
    use understory_scriptable::{ChartHandle, ChartKind};

    use crate::defaults::builtin_scope;

    #[test]
    fn names_are_unique() {
        let mut names = NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NAMES.len());
        assert!(!NAMES.contains(&LISTENERS));
    }

    #[test]
    fn every_name_resolves_and_exports() {
        let cascade = Cascade::builder().push(builtin_scope()).build().unwrap();
        let chart = ChartHandle::new("sales", ChartKind::Bar).unwrap();
        let ctx = Context::new(&chart, Some(0), Some(0));
        for key in NAMES {
            assert!(resolve_by_name(cascade.lookup(), key, &ctx).is_some(), "{key}");
        }
        assert!(resolve_by_name(cascade.lookup(), LISTENERS, &ctx).is_none());

        let native = merged_native(cascade.lookup());
        let mut exported: Vec<_> = native
            .as_object()
            .map(|object| object.keys().map(String::as_str).collect())
            .unwrap_or_default();
        exported.sort_unstable();
        let mut names = NAMES.to_vec();
        names.sort_unstable();
        assert_eq!(exported, names);
        assert_eq!(native["padding"]["top"], serde_json::json!(4.0));
        assert_eq!(native["textShadowColor"], "#666");
    }
}
