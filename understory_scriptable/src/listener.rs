// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event listener dispatch.
//!
//! Listeners are callbacks stored under an event name (`click`, `enter`,
//! `leave`). A listener returns `true` to let the engine continue its normal
//! processing of the event, `false` to stop it.

use std::sync::Arc;

use understory_option::{CallbackHandle, Key, OptionStore};

use crate::context::Context;

/// Signature of an event listener.
pub type ListenerFn = dyn Fn(&Context<'_>) -> bool + Send + Sync;

/// A shared event listener.
pub type Listener = Arc<ListenerFn>;

/// Descriptor of one listenable event.
///
/// # Example
///
/// ```rust
/// use understory_option::OptionStore;
/// use understory_scriptable::{ChartHandle, ChartKind, Context, EventListener};
///
/// const CLICK: EventListener = EventListener::new("click");
///
/// let chart = ChartHandle::new("chart", ChartKind::Pie).unwrap();
/// let mut listeners = OptionStore::new();
///
/// // Nothing registered: continue.
/// assert!(CLICK.dispatch(&listeners, &Context::new(&chart, Some(0), Some(0))));
///
/// CLICK.set_handler(&mut listeners, |_| false);
/// assert!(!CLICK.dispatch(&listeners, &Context::new(&chart, Some(0), Some(0))));
///
/// // Inconsistent contexts never reach the handler.
/// assert!(CLICK.dispatch(&listeners, &Context::new(&chart, None, Some(0))));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventListener {
    name: &'static str,
}

impl EventListener {
    /// Creates a descriptor for the event called `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the event name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Wraps a handler into a storable callback handle.
    #[must_use]
    pub fn handle<F>(handler: F) -> CallbackHandle
    where
        F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        let handler: Listener = Arc::new(handler);
        CallbackHandle::new(handler)
    }

    /// Stores the handler for this event.
    pub fn set_handler<F>(self, listeners: &mut OptionStore, handler: F)
    where
        F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        listeners.set_callback(Key::new(self.name), Some(Self::handle(handler)));
    }

    /// Removes the handler for this event. Returns `true` if one was stored.
    pub fn clear_handler(self, listeners: &mut OptionStore) -> bool {
        listeners.remove(self.name)
    }

    /// Returns the handler stored for this event.
    #[must_use]
    pub fn handler(self, listeners: &OptionStore) -> Option<Listener> {
        listeners
            .callback(self.name)
            .and_then(CallbackHandle::downcast_ref::<Listener>)
            .cloned()
    }

    /// Dispatches the event to its handler.
    ///
    /// Returns `true`, meaning "continue", when no handler is stored, when the
    /// context is inconsistent, or when the stored callback is not a listener.
    #[must_use]
    pub fn dispatch(self, listeners: &OptionStore, ctx: &Context<'_>) -> bool {
        dispatch(listeners.callback(self.name), ctx)
    }
}

/// Dispatches an event to a stored handler.
///
/// See [`EventListener::dispatch`] for the rules.
#[must_use]
pub fn dispatch(handler: Option<&CallbackHandle>, ctx: &Context<'_>) -> bool {
    let Some(handle) = handler else {
        return true;
    };
    if !ctx.is_consistent() {
        tracing::debug!("inconsistent context, skipping event listener");
        return true;
    }
    match handle.downcast_ref::<Listener>() {
        Some(listener) => listener(ctx),
        None => {
            tracing::warn!(
                callback = handle.type_name(),
                "stored callback is not an event listener"
            );
            true
        }
    }
}
