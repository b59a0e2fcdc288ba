// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration with the rendering engine.

use hashbrown::HashSet;
use understory_scriptable::ChartHandle;

use crate::options::DataLabelsOptions;

/// Identifier the plugin is registered under.
pub const PLUGIN_ID: &str = "datalabels";

/// A script the engine loads as an opaque resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptResource {
    /// Resource name, unique per engine.
    pub name: &'static str,
}

/// The plugin's own script.
pub const PLUGIN_SCRIPT: ScriptResource = ScriptResource {
    name: "chartjs-plugin-datalabels",
};

/// The calls this crate makes into the rendering engine.
pub trait RenderEngine {
    /// Loads a script resource.
    fn inject_script(&mut self, script: ScriptResource);

    /// Makes a loaded plugin known to the engine.
    fn register_plugin(&mut self, plugin_id: &str);

    /// Hands the native configuration of a plugin to one chart.
    fn configure(&mut self, chart_id: &str, plugin_id: &str, options: serde_json::Value);
}

/// Tracks what was already injected into and registered with an engine.
///
/// Keep one per engine instance.
///
/// # Example
///
/// ```rust
/// use understory_datalabels::{PluginRegistration, RenderEngine, ScriptResource};
///
/// #[derive(Default)]
/// struct Log(Vec<String>);
///
/// impl RenderEngine for Log {
///     fn inject_script(&mut self, script: ScriptResource) {
///         self.0.push(format!("inject {}", script.name));
///     }
///     fn register_plugin(&mut self, plugin_id: &str) {
///         self.0.push(format!("register {plugin_id}"));
///     }
///     fn configure(&mut self, chart_id: &str, plugin_id: &str, _: serde_json::Value) {
///         self.0.push(format!("configure {chart_id} {plugin_id}"));
///     }
/// }
///
/// let mut engine = Log::default();
/// let mut registration = PluginRegistration::new();
/// assert!(registration.ensure_registered(&mut engine));
/// assert!(!registration.ensure_registered(&mut engine));
/// assert_eq!(engine.0, ["inject chartjs-plugin-datalabels", "register datalabels"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PluginRegistration {
    scripts: HashSet<ScriptResource>,
    plugins: HashSet<&'static str>,
}

impl PluginRegistration {
    /// Creates a registration record for a fresh engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once the plugin is registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.plugins.contains(PLUGIN_ID)
    }

    /// Injects the plugin script and registers the plugin, once.
    ///
    /// Returns `true` if this call did the registration.
    pub fn ensure_registered<E: RenderEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        if self.scripts.insert(PLUGIN_SCRIPT) {
            tracing::debug!(script = PLUGIN_SCRIPT.name, "injecting plugin script");
            engine.inject_script(PLUGIN_SCRIPT);
        }
        if !self.plugins.insert(PLUGIN_ID) {
            return false;
        }
        tracing::debug!(plugin = PLUGIN_ID, "registering plugin");
        engine.register_plugin(PLUGIN_ID);
        true
    }

    /// Registers the plugin if needed, then hands `options` to `chart`.
    ///
    /// The engine receives [`DataLabelsOptions::to_merged_native`]: every
    /// option with its defaults applied, and placeholders for callbacks.
    pub fn attach<E: RenderEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        chart: &ChartHandle,
        options: &DataLabelsOptions,
    ) {
        self.ensure_registered(engine);
        tracing::trace!(chart = chart.id(), "configuring data labels");
        engine.configure(chart.id(), PLUGIN_ID, options.to_merged_native());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use understory_cascade::{DefaultsScope, ScopeLevel};
    use understory_option::OptionStore;
    use understory_scriptable::{ChartKind, EventListener, Scriptable};

    use crate::defaults::Defaults;
    use crate::event::Event;
    use crate::padding::Padding;
    use crate::properties::{BORDER_WIDTH, FORMATTER, LISTENERS, NAMES, OFFSET, PADDING};

    #[derive(Default)]
    struct Recorder {
        scripts: usize,
        plugins: usize,
        configured: Vec<(String, serde_json::Value)>,
    }

    impl RenderEngine for Recorder {
        fn inject_script(&mut self, _: ScriptResource) {
            self.scripts += 1;
        }

        fn register_plugin(&mut self, _: &str) {
            self.plugins += 1;
        }

        fn configure(&mut self, chart_id: &str, _: &str, options: serde_json::Value) {
            self.configured.push((chart_id.to_owned(), options));
        }
    }

    #[test]
    fn attach_registers_once_and_configures_each_chart() {
        let mut engine = Recorder::default();
        let mut registration = PluginRegistration::new();
        let mut options = Defaults::new().options(ChartKind::Bar).unwrap();
        options
            .item_mut()
            .set_callback(FORMATTER, |_, raw| Some(raw.display_string()));

        for id in ["a", "b"] {
            let chart = ChartHandle::new(id, ChartKind::Bar).unwrap();
            registration.attach(&mut engine, &chart, &options);
        }

        assert!(registration.is_registered());
        assert_eq!((engine.scripts, engine.plugins), (1, 1));
        assert_eq!(engine.configured.len(), 2);
        assert_eq!(engine.configured[1].0, "b");
        let native = &engine.configured[0].1;
        assert_eq!(native["formatter"], json!({ "__scriptable__": "formatter" }));
        assert_eq!(native["offset"], json!(4.0));
        assert_eq!(
            native.as_object().map(serde_json::Map::len),
            Some(NAMES.len()),
            "every option is configured"
        );
    }

    #[test]
    fn attach_sends_defaults_and_default_callbacks() {
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
            .unwrap();
        defaults
            .set_plugin(
                DefaultsScope::builder(ScopeLevel::Plugin)
                    .set(LISTENERS, {
                        let mut listeners = OptionStore::new();
                        listeners.set(Event::Click.as_str(), EventListener::handle(|_| false));
                        listeners
                    })
                    .build(),
            )
            .unwrap();
        let mut options = defaults.options(ChartKind::Bar).unwrap();
        options.item_mut().set(OFFSET, 9.0);
        options.insert_label("title").unwrap().set(PADDING, Padding::uniform(1.0));

        let mut engine = Recorder::default();
        let chart = ChartHandle::new("sales", ChartKind::Bar).unwrap();
        PluginRegistration::new().attach(&mut engine, &chart, &options);

        let native = &engine.configured[0].1;
        assert_eq!(native["borderWidth"], json!({ "__scriptable__": "borderWidth" }));
        assert_eq!(native["offset"], json!(9.0));
        assert_eq!(native["opacity"], json!(1.0));
        assert_eq!(native["color"], "#666");
        assert_eq!(native["textStrokeColor"], "#666");
        assert_eq!(native["padding"]["left"], json!(4.0));
        assert_eq!(native["font"]["size"], json!(12.0));
        assert_eq!(
            native["listeners"],
            json!({ "click": { "__scriptable__": "click" } })
        );

        let title = &native["labels"]["title"];
        assert_eq!(title["padding"]["left"], json!(1.0));
        assert_eq!(title["offset"], json!(9.0), "labels inherit top-level options");
        assert_eq!(title["borderWidth"], json!({ "__scriptable__": "borderWidth" }));
    }
}
