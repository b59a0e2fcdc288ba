// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single set of label options.

use understory_cascade::{Cascade, Lookup};
use understory_option::{FromValue, OptionStore, Value, ValueType};
use understory_scriptable::{Context, Resolver, ScriptValue, Scriptable};

use crate::event::{Event, EventSet};
use crate::font::Font;
use crate::padding::Padding;
use crate::properties::{FONT, FORMATTER, LISTENERS, PADDING};

/// Options of one label.
///
/// Every option is read and written through its [`Scriptable`] descriptor
/// (see [`crate::properties`]): [`LabelItem::set`] stores a literal,
/// [`LabelItem::set_callback`] a callback, and each replaces the other.
/// [`LabelItem::get`] reads the literal view, falling back to defaults.
///
/// # Example
///
/// ```rust
/// use understory_datalabels::properties::{BORDER_WIDTH, OPACITY};
/// use understory_datalabels::{Defaults, LabelItem};
/// use understory_scriptable::{ChartKind, NonNegative};
///
/// let cascade = Defaults::new().cascade(ChartKind::Bar).unwrap();
/// let mut label = LabelItem::new(cascade);
///
/// assert_eq!(label.get(OPACITY), NonNegative::new(1.0));
/// label.set(BORDER_WIDTH, 2);
/// assert_eq!(label.get(BORDER_WIDTH), Some(2));
///
/// // A callback replaces the literal; the literal view shows the default.
/// label.set_callback(BORDER_WIDTH, |ctx, _| ctx.data_index().map(|i| i as u32));
/// assert_eq!(label.get(BORDER_WIDTH), Some(0));
/// ```
#[derive(Clone, Debug)]
pub struct LabelItem {
    options: OptionStore,
    cascade: Cascade,
}

impl LabelItem {
    /// Creates empty options resolving against `cascade`.
    #[must_use]
    pub fn new(cascade: Cascade) -> Self {
        Self::with_options(cascade, OptionStore::new())
    }

    /// Wraps existing options.
    #[must_use]
    pub fn with_options(cascade: Cascade, options: OptionStore) -> Self {
        Self { options, cascade }
    }

    /// Returns the raw options.
    #[must_use]
    #[inline]
    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    /// Returns the cascade these options resolve against.
    #[must_use]
    #[inline]
    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Returns a lookup of these options against their cascade.
    #[must_use]
    pub fn lookup(&self) -> Lookup<'_> {
        self.cascade.lookup().with_item(&self.options)
    }

    /// Returns a resolver for these options.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.lookup())
    }

    /// Stores a literal, replacing any callback.
    pub fn set<T: ScriptValue + Into<Value>>(
        &mut self,
        option: Scriptable<T>,
        value: T,
    ) -> &mut Self {
        option.set(&mut self.options, value);
        self
    }

    /// Stores a callback, replacing any literal.
    pub fn set_callback<T, F>(&mut self, option: Scriptable<T>, callback: F) -> &mut Self
    where
        T: ScriptValue,
        F: Fn(&Context<'_>, &Value) -> T::Output + Send + Sync + 'static,
    {
        option.set_callback(&mut self.options, callback);
        self
    }

    /// Removes the option's literal or callback. Returns `true` if one was stored.
    pub fn remove<T>(&mut self, option: Scriptable<T>) -> bool {
        self.options.remove(option.name())
    }

    /// Returns `true` if the option holds a literal or a callback.
    #[must_use]
    pub fn has<T>(&self, option: Scriptable<T>) -> bool {
        self.options.has(option.name())
    }

    /// Returns the type of what the option holds.
    #[must_use]
    pub fn value_type<T>(&self, option: Scriptable<T>) -> ValueType {
        self.options.value_type(option.name())
    }

    /// Returns `true` if the option holds a callback.
    #[must_use]
    pub fn is_scripted<T>(&self, option: Scriptable<T>) -> bool {
        self.options.callback(option.name()).is_some()
    }

    /// Reads the literal view of an option: the stored literal, or else its
    /// default. Callbacks are not run.
    #[must_use]
    pub fn get<T: ScriptValue + FromValue>(&self, option: Scriptable<T>) -> Option<T> {
        T::from_value(&self.resolver().literal(option))
    }

    /// Stores the label text formatter.
    pub fn set_formatter<F>(&mut self, formatter: F) -> &mut Self
    where
        F: Fn(&Context<'_>, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.set_callback(FORMATTER, formatter)
    }

    /// Removes the label text formatter.
    pub fn clear_formatter(&mut self) -> bool {
        FORMATTER.clear_callback(&mut self.options)
    }

    /// Returns the font, merged over its defaults.
    #[must_use]
    pub fn font(&self) -> Font {
        self.get(FONT).unwrap_or_default()
    }

    /// Replaces the font fields set on these options.
    pub fn set_font(&mut self, font: Font) -> &mut Self {
        self.set(FONT, font)
    }

    /// Returns the nested font options for in-place edits.
    pub fn font_mut(&mut self) -> &mut OptionStore {
        self.options.nested_mut(FONT.key())
    }

    /// Returns the padding, merged over its defaults.
    #[must_use]
    pub fn padding(&self) -> Padding {
        self.get(PADDING).unwrap_or_default()
    }

    /// Replaces the padding.
    pub fn set_padding(&mut self, padding: Padding) -> &mut Self {
        self.set(PADDING, padding)
    }

    /// Stores the handler for `event`.
    pub fn set_listener<F>(&mut self, event: Event, handler: F) -> &mut Self
    where
        F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        event
            .listener()
            .set_handler(self.options.nested_mut(LISTENERS), handler);
        self
    }

    /// Stores one handler for every event. It receives the event as well.
    pub fn set_listeners_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(Event, &Context<'_>) -> bool + Clone + Send + Sync + 'static,
    {
        for event in Event::ALL {
            let handler = handler.clone();
            self.set_listener(event, move |ctx| handler(event, ctx));
        }
        self
    }

    /// Removes the handler for `event`. Returns `true` if one was stored.
    ///
    /// The listeners container is dropped once it is empty.
    pub fn clear_listener(&mut self, event: Event) -> bool {
        let Some(listeners) = self.options.nested(LISTENERS) else {
            return false;
        };
        if !listeners.has(event.as_str()) {
            return false;
        }
        let listeners = self.options.nested_mut(LISTENERS);
        event.listener().clear_handler(listeners);
        if listeners.is_empty() {
            self.options.remove(LISTENERS);
        }
        true
    }

    /// Returns the events with a handler.
    #[must_use]
    pub fn listeners(&self) -> EventSet {
        self.options
            .nested(LISTENERS)
            .map_or(EventSet::empty(), EventSet::registered_in)
    }

    /// Exports the options as a native (JSON) object.
    #[must_use]
    pub fn to_native(&self) -> serde_json::Value {
        self.options.to_native()
    }
}
