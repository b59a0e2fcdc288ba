// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Option: the option container behind chart plugin configuration.
//!
//! Chart options are a bag of named values. A value is either a literal
//! (number, string, color, boolean, nested container) or a callback that is
//! evaluated per datapoint at render time. This crate provides the storage
//! half of that model; default resolution lives in `understory_cascade` and
//! callback evaluation in `understory_scriptable`.
//!
//! ## Core Concepts
//!
//! - [`Key`]: the engine's name for an option (`"backgroundColor"`).
//! - [`Value`]: the closed variant an option holds.
//! - [`CallbackHandle`]: a shared, type-erased callback stored in place of a literal.
//! - [`OptionStore`]: an ordered key/value container with change tracking.
//!
//! ## Key Operations
//!
//! - `get(key, default)` - typed read, never fails
//! - `set(key, value)` - store a literal, superseding a callback
//! - `set_callback(key, Some(handle))` - store a callback, superseding a literal
//! - `set_callback(key, None)` / `remove(key)` - drop the key entirely
//! - `has(key)`, `value_type(key)`
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_option::{OptionStore, ValueType};
//!
//! let mut options = OptionStore::new();
//! options.set("color", "#123456");
//! options.nested_mut("font").set("size", 14.0);
//!
//! assert_eq!(options.get("color", String::new()), "#123456");
//! assert_eq!(options.value_type("font"), ValueType::Object);
//! assert_eq!(options.value_type("opacity"), ValueType::Undefined);
//!
//! assert!(options.remove("color"));
//! assert!(!options.remove("color"));
//!
//! assert_eq!(
//!     options.to_native(),
//!     serde_json::json!({ "font": { "size": 14.0 } })
//! );
//! ```

mod callback;
mod key;
mod store;
mod value;

pub use callback::CallbackHandle;
pub use key::Key;
pub use store::OptionStore;
pub use value::{FromValue, SCRIPTABLE_MARKER, Value, ValueType, css_string, parse_color};

pub use peniko::Color;
