// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Data Labels: typed, scriptable options for a chart data-label
//! plugin.
//!
//! Every label option (`color`, `font`, `display`, `formatter`, ...) is a
//! [`Scriptable`](understory_scriptable::Scriptable) constant in
//! [`properties`]. Options are stored in a [`LabelItem`], grouped per chart in
//! [`DataLabelsOptions`] together with any named labels, and resolve against
//! the shared [`Defaults`] for the chart's kind.
//!
//! Defaults apply in this order, highest first: the label's own value, the
//! top-level options (for named labels), the chart kind's scope, the plugin
//! scope, the engine's global defaults, and the built-in constants.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_datalabels::properties::{BACKGROUND_COLOR, DISPLAY};
//! use understory_datalabels::{Defaults, Event};
//! use understory_option::Value;
//! use understory_scriptable::{ChartHandle, ChartKind, ColorValue, Display, NativeContext};
//!
//! let defaults = Defaults::new();
//! let mut options = defaults.options(ChartKind::Bar).unwrap();
//! options
//!     .item_mut()
//!     .set(DISPLAY, Display::Auto)
//!     .set_callback(BACKGROUND_COLOR, |ctx, _| {
//!         let value = ctx.raw_value()?.as_f64()?;
//!         Some(ColorValue::from(if value > 10.0 { "green" } else { "gray" }))
//!     })
//!     .set_formatter(|_, raw| Some(format!("{} units", raw.display_string())))
//!     .set_listener(Event::Click, |ctx| ctx.data_index() != Some(0));
//!
//! let mut chart = ChartHandle::new("stock", ChartKind::Bar).unwrap();
//! chart.push_values(vec![4.0, 12.0]).unwrap();
//! let at = NativeContext::at(0, 1);
//!
//! let color = options.resolve(None, "backgroundColor", Some(&chart), &at).unwrap();
//! assert_eq!(color, Value::from("green"));
//! assert_eq!(options.format(None, Some(&chart), &at).unwrap(), "12 units");
//! assert!(!options.dispatch(None, Event::Click, Some(&chart), &NativeContext::at(0, 0)).unwrap());
//!
//! // The engine receives every option, with placeholders where callbacks apply.
//! let native = options.to_merged_native();
//! assert_eq!(native["display"], "auto");
//! assert_eq!(native["backgroundColor"]["__scriptable__"], "backgroundColor");
//! ```

mod defaults;
mod enums;
mod error;
mod event;
mod font;
mod item;
mod options;
mod padding;
mod plugin;
pub mod properties;

pub use defaults::{Defaults, EngineDefaults, EngineFont, builtin_scope};
pub use enums::{Align, Anchor, FontStyle, FontWeight, TextAlign};
pub use error::DataLabelsError;
pub use event::{Event, EventSet};
pub use font::Font;
pub use item::LabelItem;
pub use options::{DataLabelsOptions, LABELS};
pub use padding::Padding;
pub use plugin::{PLUGIN_ID, PLUGIN_SCRIPT, PluginRegistration, RenderEngine, ScriptResource};
