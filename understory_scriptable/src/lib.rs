// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scriptable: render-time resolution of scriptable chart options.
//!
//! A scriptable option holds either a literal or a callback. When the engine
//! draws an element it asks for the option's value; a literal is returned as
//! is, a callback is run with a [`Context`] describing the element, and its
//! result is coerced to the option's type. Anything that cannot be used, be it
//! an inconsistent context, a null result or a value of the wrong shape, falls
//! back to the option's default from `understory_cascade`.
//!
//! ## Core Concepts
//!
//! - [`Scriptable<T>`]: a typed option descriptor. One generic type serves every
//!   option; `T` selects the coercion rules through [`ScriptValue`].
//! - [`Context`]: chart, dataset index, data index and active flag. Only
//!   consistent contexts (both indices defined) reach user code.
//! - [`Resolver`]: runs the resolution state machine for one options item.
//! - [`EventListener`]: `click`/`enter`/`leave` style handlers returning
//!   "continue" flags.
//! - [`ChartHandle`]: the chart a context points into, with its data.
//!
//! ## Special coercions
//!
//! | Option type | Callback result | Value |
//! |---|---|---|
//! | [`Display`] | `true`/`false` | the boolean |
//! | [`Display`] | `"auto"` | `"auto"` |
//! | [`Display`] | anything else | its truthiness |
//! | [`Formatter`] | `None` | the raw value as a string |
//! | [`NonNegative`] | a negative number | the default |
//! | [`ColorValue`] | a string that is not a color | the default |
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_cascade::{Cascade, DefaultsScope, ScopeLevel};
//! use understory_option::{OptionStore, Value};
//! use understory_scriptable::{
//!     ChartHandle, ChartKind, ColorValue, Context, NativeContext, Resolver, Scriptable,
//! };
//!
//! const COLOR: Scriptable<ColorValue> = Scriptable::new("color");
//!
//! let cascade = Cascade::builder()
//!     .push(DefaultsScope::builder(ScopeLevel::Global).set("color", "#666").build())
//!     .build()
//!     .unwrap();
//!
//! let mut chart = ChartHandle::new("revenue", ChartKind::Bar).unwrap();
//! chart.push_values(vec![-3.0, 8.0]).unwrap();
//!
//! let mut label = OptionStore::new();
//! COLOR.set_callback(&mut label, |ctx, _| {
//!     let value = ctx.raw_value()?.as_f64()?;
//!     Some(ColorValue::from(if value < 0.0 { "red" } else { "green" }))
//! });
//!
//! let resolver = Resolver::new(cascade.lookup().with_item(&label));
//! let native = NativeContext::at(0, 0);
//! let ctx = Context::from_native(Some(&chart), &native).unwrap();
//! assert_eq!(resolver.resolve(COLOR, &ctx), Value::from("red"));
//! ```

mod chart;
mod context;
mod error;
mod listener;
mod resolve;
mod scriptable;

pub use chart::{ChartHandle, ChartKind, DatasetData, GeoFeature};
pub use context::{Context, NativeContext};
pub use error::ScriptableError;
pub use listener::{EventListener, Listener, ListenerFn, dispatch};
pub use resolve::{Resolved, Resolver, Source};
pub use scriptable::{
    AUTO, Callback, ColorValue, Display, Formatter, NonNegative, ScriptFn, ScriptValue, Scriptable,
};
