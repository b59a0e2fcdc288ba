// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end resolution of data-label options.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use understory_cascade::{DefaultsScope, ScopeLevel};
use understory_datalabels::properties::{
    BACKGROUND_COLOR, BORDER_WIDTH, COLOR, DISPLAY, FONT, LISTENERS, OFFSET, OPACITY, PADDING,
    TEXT_STROKE_COLOR,
};
use understory_datalabels::{
    DataLabelsError, DataLabelsOptions, Defaults, Event, Font, Padding, PluginRegistration,
    RenderEngine, ScriptResource,
};
use understory_option::{FromValue, OptionStore, Value, ValueType};
use understory_scriptable::{
    ChartHandle, ChartKind, ColorValue, Context, EventListener, GeoFeature, NativeContext,
    Scriptable, ScriptableError, Source,
};

fn bar_chart() -> ChartHandle {
    let mut chart = ChartHandle::new("sales", ChartKind::Bar).unwrap();
    chart.push_values(vec![1.0, 2.0, 3.0]).unwrap();
    chart
}

fn undefined_data_index() -> NativeContext {
    NativeContext {
        dataset_index: Some(0),
        data_index: Some(-1),
        active: None,
    }
}

#[test]
fn opacity_resolves_to_its_global_default() {
    let options = Defaults::new().options(ChartKind::Bar).unwrap();
    let chart = bar_chart();
    let value = options
        .resolve(None, "opacity", Some(&chart), &NativeContext::at(0, 0))
        .unwrap();
    assert_eq!(value, Value::Number(1.0));
    assert_eq!(options.item().value_type(OPACITY), ValueType::Undefined);
}

#[test]
fn callback_replaces_literal_and_inconsistent_context_uses_defaults() {
    let mut defaults = Defaults::new();
    defaults
        .set_chart(
            ChartKind::Bar,
            DefaultsScope::builder(ScopeLevel::Chart)
                .set("backgroundColor", "#0000ff")
                .build(),
        )
        .unwrap();
    let mut options = defaults.options(ChartKind::Bar).unwrap();
    let chart = bar_chart();

    let calls = Arc::new(AtomicUsize::new(0));
    let recorded = Arc::clone(&calls);
    options
        .item_mut()
        .set(BACKGROUND_COLOR, ColorValue::from("#ff0000"))
        .set_callback(BACKGROUND_COLOR, move |_, _| {
            recorded.fetch_add(1, Ordering::SeqCst);
            Some(ColorValue::from("#00ff00"))
        });
    assert_eq!(options.item().value_type(BACKGROUND_COLOR), ValueType::Function);

    let resolved = options
        .resolve(None, "backgroundColor", Some(&chart), &NativeContext::at(0, 1))
        .unwrap();
    assert_eq!(resolved, Value::from("#00ff00"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let fallback = options
        .resolve(None, "backgroundColor", Some(&chart), &undefined_data_index())
        .unwrap();
    assert_eq!(fallback, Value::from("#0000ff"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn text_stroke_color_follows_color() {
    let mut options = Defaults::new().options(ChartKind::Line).unwrap();
    options.item_mut().set(COLOR, ColorValue::from("#123456"));
    let chart = ChartHandle::new("trend", ChartKind::Line).unwrap();
    let value = options
        .resolve(None, "textStrokeColor", Some(&chart), &NativeContext::at(0, 0))
        .unwrap();
    assert_eq!(value, Value::from("#123456"));
    assert_eq!(
        options.get(None, TEXT_STROKE_COLOR).unwrap(),
        Some(ColorValue::from("#123456"))
    );
}

#[test]
fn resolution_reports_its_source() {
    let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
    let chart = bar_chart();
    options
        .item_mut()
        .set_callback(OPACITY, |ctx, _| ctx.raw_value()?.as_f64().map(|v| v - 2.0));

    let resolver = options.item().resolver();
    let at = |i| Context::new(&chart, Some(0), Some(i));
    assert_eq!(resolver.resolve_traced(OPACITY, &at(2)).source, Source::Callback);
    // 1.0 - 2.0 is negative: not a usable opacity.
    let negative = resolver.resolve_traced(OPACITY, &at(0));
    assert_eq!(negative.source, Source::Fallback);
    assert_eq!(negative.value, Value::Number(1.0));
    assert_eq!(
        resolver.resolve_traced(DISPLAY, &at(0)).source,
        Source::Default
    );
}

#[test]
fn display_callbacks_are_coerced() {
    let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
    let chart = bar_chart();
    options.item_mut().set_callback(DISPLAY, |ctx, _| match ctx.data_index() {
        Some(0) => Value::from("auto"),
        Some(1) => Value::from(0.0),
        Some(_) => Value::from("visible"),
        None => Value::Null,
    });
    let display = |i| {
        options
            .resolve(None, "display", Some(&chart), &NativeContext::at(0, i))
            .unwrap()
    };
    assert_eq!(display(0), Value::from("auto"));
    assert_eq!(display(1), Value::Bool(false));
    assert_eq!(display(2), Value::Bool(true));
}

#[test]
fn formatter_falls_back_to_the_raw_value() {
    let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
    let chart = bar_chart();
    options.item_mut().set_formatter(|ctx, raw| {
        (ctx.data_index() == Some(2)).then(|| format!("#{}", raw.display_string()))
    });

    let text = |native: &NativeContext| options.format(None, Some(&chart), native).unwrap();
    assert_eq!(text(&NativeContext::at(0, 0)), "1");
    assert_eq!(text(&NativeContext::at(0, 2)), "#3");
    assert_eq!(
        options
            .resolve(None, "formatter", Some(&chart), &NativeContext::at(0, 1))
            .unwrap(),
        Value::from("2")
    );
}

#[test]
fn geographic_labels_format_features() {
    let mut chart = ChartHandle::new("world", ChartKind::Choropleth).unwrap();
    let err = chart.push_values(vec![1.0]).unwrap_err();
    assert!(matches!(
        err,
        ScriptableError::Unsupported {
            alternative: "push_features",
            ..
        }
    ));
    chart
        .push_features(vec![GeoFeature::new("France", 67.0)])
        .unwrap();

    let mut options = Defaults::new().options(ChartKind::Choropleth).unwrap();
    options.item_mut().set_formatter(|ctx, _| {
        let raw = ctx.raw_value()?;
        let feature = raw.as_object()?;
        Some(format!(
            "{}: {}",
            feature.get("feature", String::new()),
            feature.get("value", 0.0)
        ))
    });
    assert_eq!(
        options
            .format(None, Some(&chart), &NativeContext::at(0, 0))
            .unwrap(),
        "France: 67"
    );
}

#[test]
fn nested_options_merge_with_defaults() {
    let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
    let chart = bar_chart();
    options
        .item_mut()
        .set(FONT, Font::new().with_size(18.0))
        .set_callback(PADDING, |ctx, default| {
            let mut padding = Padding::from_value(default).unwrap_or_default();
            padding.left = ctx.data_index()? as f64;
            Some(padding)
        });

    let at = NativeContext::at(0, 2);
    let font = options.resolve(None, "font", Some(&chart), &at).unwrap();
    let font = font.as_object().unwrap();
    assert_eq!(font.get("size", 0.0), 18.0);
    assert_eq!(font.get("lineHeight", 0.0), 1.2);

    let padding = options.resolve(None, "padding", Some(&chart), &at).unwrap();
    let padding = padding.as_object().unwrap();
    assert_eq!(padding.get("left", 0.0), 2.0);
    assert_eq!(padding.get("top", 0.0), 4.0);
}

#[test]
fn named_labels_inherit_and_override() {
    let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
    let chart = bar_chart();
    options.item_mut().set_callback(COLOR, |ctx, _| {
        Some(ColorValue::from(if ctx.data_index()? % 2 == 0 { "red" } else { "blue" }))
    });
    options.insert_label("index").unwrap();
    options
        .insert_label("value")
        .unwrap()
        .set(COLOR, ColorValue::from("black"));

    let color = |label, i| {
        options
            .resolve(Some(label), "color", Some(&chart), &NativeContext::at(0, i))
            .unwrap()
    };
    assert_eq!(color("index", 0), Value::from("red"));
    assert_eq!(color("index", 1), Value::from("blue"));
    assert_eq!(color("value", 1), Value::from("black"));

    assert!(matches!(
        options.resolve(Some("nope"), "color", Some(&chart), &NativeContext::at(0, 0)),
        Err(DataLabelsError::UnknownLabel { .. })
    ));
}

#[test]
fn listeners_continue_by_default() {
    let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
    let chart = bar_chart();
    let clicks = Arc::new(AtomicUsize::new(0));
    let recorded = Arc::clone(&clicks);
    options.item_mut().set_listener(Event::Click, move |_| {
        recorded.fetch_add(1, Ordering::SeqCst);
        false
    });
    options
        .insert_label("quiet")
        .unwrap()
        .set_listener(Event::Click, |_| true);

    let at = NativeContext::at(0, 0);
    let dispatch = |label, event| {
        options
            .dispatch(label, event, Some(&chart), &at)
            .unwrap()
    };
    assert!(!dispatch(None, Event::Click));
    assert!(dispatch(None, Event::Enter));
    assert!(dispatch(Some("quiet"), Event::Click));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);

    // Inconsistent contexts never reach the handler.
    assert!(
        options
            .dispatch(None, Event::Click, Some(&chart), &undefined_data_index())
            .unwrap()
    );
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[test]
fn configuration_errors_fail_fast() {
    let options = Defaults::new().options(ChartKind::Bar).unwrap();
    assert!(matches!(
        options.resolve(None, "opacity", None, &NativeContext::at(0, 0)),
        Err(DataLabelsError::Scriptable(ScriptableError::MissingArgument {
            argument: "chart"
        }))
    ));
    assert!(matches!(
        options.resolve(None, "colour", Some(&bar_chart()), &NativeContext::at(0, 0)),
        Err(DataLabelsError::UnknownOption { .. })
    ));
    assert!(ChartHandle::new("", ChartKind::Pie).is_err());
}

#[test]
fn native_export_matches_engine_schema() {
    let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
    options
        .item_mut()
        .set(BACKGROUND_COLOR, ColorValue::from("#ff0000"))
        .set(PADDING, Padding::new(1.0, 2.0, 3.0, 4.0))
        .set_font(Font::new().with_size(14.0))
        .set_listener(Event::Click, |_| true)
        .set_formatter(|_, _| None);
    options
        .insert_label("title")
        .unwrap()
        .set(COLOR, ColorValue::from("white"));

    assert_eq!(
        options.to_native(),
        serde_json::json!({
            "backgroundColor": "#ff0000",
            "padding": { "top": 1.0, "right": 2.0, "bottom": 3.0, "left": 4.0 },
            "font": { "size": 14.0 },
            "listeners": { "click": { "__scriptable__": "click" } },
            "formatter": { "__scriptable__": "formatter" },
            "labels": { "title": { "color": "white" } }
        })
    );

    let imported = DataLabelsOptions::from_native(
        Defaults::new().cascade(ChartKind::Bar).unwrap(),
        &options.to_native(),
    )
    .unwrap();
    assert!(imported.item().listeners().is_empty());
    assert_eq!(imported.item().padding(), Padding::new(1.0, 2.0, 3.0, 4.0));
}

#[test]
fn scalar_padding_imports_as_every_side() {
    let options = DataLabelsOptions::from_native(
        Defaults::new().cascade(ChartKind::Bar).unwrap(),
        &serde_json::json!({
            "padding": 10,
            "labels": { "tight": { "padding": 0 }, "loose": {} }
        }),
    )
    .unwrap();
    let chart = bar_chart();
    let at = NativeContext::at(0, 1);
    let padding = |label| {
        let value = options.resolve(label, "padding", Some(&chart), &at).unwrap();
        Padding::from_value(&value)
    };
    assert_eq!(padding(None), Some(Padding::uniform(10.0)));
    assert_eq!(padding(Some("loose")), Some(Padding::uniform(10.0)));
    assert_eq!(padding(Some("tight")), Some(Padding::uniform(0.0)));
    assert_eq!(options.item().padding(), Padding::uniform(10.0));
    assert_eq!(
        options.to_merged_native()["padding"],
        serde_json::json!({ "top": 10.0, "right": 10.0, "bottom": 10.0, "left": 10.0 })
    );
}

#[derive(Default)]
struct Engine {
    configured: Vec<serde_json::Value>,
}

impl RenderEngine for Engine {
    fn inject_script(&mut self, _: ScriptResource) {}

    fn register_plugin(&mut self, _: &str) {}

    fn configure(&mut self, _: &str, _: &str, options: serde_json::Value) {
        self.configured.push(options);
    }
}

#[test]
fn engine_receives_default_scope_callbacks() {
    let mut listeners = OptionStore::new();
    listeners.set(Event::Leave.as_str(), EventListener::handle(|_| false));
    let mut defaults = Defaults::new();
    defaults
        .set_chart(
            ChartKind::Bar,
            DefaultsScope::builder(ScopeLevel::Chart)
                .set(
                    BORDER_WIDTH.name(),
                    Scriptable::<u32>::handle(|ctx, _| {
                        ctx.data_index().and_then(|i| u32::try_from(i).ok())
                    }),
                )
                .build(),
        )
        .unwrap()
        .set_plugin(
            DefaultsScope::builder(ScopeLevel::Plugin)
                .set(LISTENERS, listeners)
                .build(),
        )
        .unwrap();
    let mut options = defaults.options(ChartKind::Bar).unwrap();
    options.item_mut().set(OFFSET, 9.0);

    let chart = bar_chart();
    let mut engine = Engine::default();
    PluginRegistration::new().attach(&mut engine, &chart, &options);
    let native = &engine.configured[0];
    assert_eq!(
        native["borderWidth"],
        serde_json::json!({ "__scriptable__": "borderWidth" })
    );
    assert_eq!(native["offset"], serde_json::json!(9.0));
    assert_eq!(native["display"], serde_json::json!(true));
    assert_eq!(
        native["listeners"],
        serde_json::json!({ "leave": { "__scriptable__": "leave" } })
    );

    // The engine calls back for each placeholder.
    let at = NativeContext::at(0, 2);
    assert_eq!(
        options.resolve(None, "borderWidth", Some(&chart), &at).unwrap(),
        Value::Number(2.0)
    );
    assert!(!options.dispatch(None, Event::Leave, Some(&chart), &at).unwrap());
}

#[test]
fn audit_flags_options_without_defaults() {
    let mut defaults = Defaults::new();
    defaults
        .set_global(
            DefaultsScope::builder(ScopeLevel::Global)
                .set("color", "#000")
                .build(),
        )
        .unwrap();
    assert!(defaults.audit(ChartKind::Bar).unwrap().is_empty());
}

#[test]
#[should_panic(expected = "no default defined for option `rotation`")]
fn strict_mode_panics_on_missing_defaults() {
    let defaults = Defaults::new().strict(true);
    let cascade = defaults
        .cascade(ChartKind::Bar)
        .unwrap()
        .with_scope(DefaultsScope::empty(ScopeLevel::BuiltIn));
    let _ = cascade.resolve_default("rotation");
}
