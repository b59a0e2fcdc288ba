// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Cascade: layered default resolution for chart options.
//!
//! Every option that an item does not set resolves through a chain of
//! default scopes:
//!
//! **Item value → Item defaults → Chart → Plugin → Global → Built-in → null**
//!
//! ## Core Concepts
//!
//! - [`ScopeLevel`]: where a set of defaults applies.
//! - [`DefaultRule`]: a constant, a sibling reference ([`DefaultRule::SameAs`])
//!   or a computed derivation.
//! - [`DefaultsScope`]: an immutable, shareable set of rules for one level.
//! - [`Cascade`]: the ordered stack of scopes a chart resolves against.
//! - [`Lookup`]: resolution of one item (plus inherited item defaults) against
//!   a cascade.
//!
//! There is no process-wide registry of defaults: a `Cascade` is built
//! explicitly and handed to whatever needs to resolve options.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_cascade::{Cascade, DefaultsScope, ScopeLevel};
//! use understory_option::{OptionStore, Value};
//!
//! let cascade = Cascade::builder()
//!     .push(
//!         DefaultsScope::builder(ScopeLevel::BuiltIn)
//!             .set("color", "#666")
//!             .same_as("textStrokeColor", "color")
//!             .build(),
//!     )
//!     .push(DefaultsScope::builder(ScopeLevel::Global).set("opacity", 1.0).build())
//!     .build()
//!     .unwrap();
//!
//! let mut item = OptionStore::new();
//! item.set("color", "#123456");
//!
//! let lookup = cascade.lookup().with_item(&item);
//! assert_eq!(lookup.resolve("opacity"), Value::Number(1.0));
//! assert_eq!(lookup.resolve("textStrokeColor"), Value::from("#123456"));
//! ```
//!
//! ## Missing defaults
//!
//! An option with no default anywhere resolves to [`Value::Null`] and logs a
//! warning. A strict cascade ([`CascadeBuilder::strict`]) panics with the
//! option name instead, and [`Cascade::missing_global_defaults`] lists such
//! options up front.
//!
//! [`Value::Null`]: understory_option::Value::Null

mod cascade;
mod error;
mod scope;

pub use cascade::{Cascade, CascadeBuilder, Lookup};
pub use error::CascadeError;
pub use scope::{ComputeFn, DefaultRule, DefaultsScope, DefaultsScopeBuilder, ScopeLevel};
