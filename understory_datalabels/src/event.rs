// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label events.

use bitflags::bitflags;
use understory_option::OptionStore;
use understory_scriptable::EventListener;

/// Pointer events a label can listen to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The label was clicked.
    Click,
    /// The pointer entered the label.
    Enter,
    /// The pointer left the label.
    Leave,
}

impl Event {
    /// Every event, in dispatch order.
    pub const ALL: [Self; 3] = [Self::Click, Self::Enter, Self::Leave];

    /// Returns the listener descriptor for this event.
    #[must_use]
    pub const fn listener(self) -> EventListener {
        EventListener::new(self.as_str())
    }

    /// Returns the engine name of this event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Enter => "enter",
            Self::Leave => "leave",
        }
    }

    /// Parses an engine event name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }

    /// Returns the flag for this event.
    #[must_use]
    pub const fn flag(self) -> EventSet {
        match self {
            Self::Click => EventSet::CLICK,
            Self::Enter => EventSet::ENTER,
            Self::Leave => EventSet::LEAVE,
        }
    }
}

bitflags! {
    /// A set of [`Event`]s.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct EventSet: u8 {
        /// [`Event::Click`].
        const CLICK = 1 << 0;
        /// [`Event::Enter`].
        const ENTER = 1 << 1;
        /// [`Event::Leave`].
        const LEAVE = 1 << 2;
    }
}

impl EventSet {
    /// Returns the events that have a handler in `listeners`.
    #[must_use]
    pub fn registered_in(listeners: &OptionStore) -> Self {
        Event::ALL
            .into_iter()
            .filter(|e| listeners.callback(e.as_str()).is_some())
            .fold(Self::empty(), |set, e| set | e.flag())
    }
}
