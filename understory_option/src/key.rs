// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable option names.

use std::borrow::{Borrow, Cow};
use std::fmt;

/// The name of an option, as the rendering engine knows it.
///
/// Keys are usually `&'static str` constants (`"backgroundColor"`), but can
/// also own their name, which is how user-chosen label identifiers are stored.
///
/// A `Key` borrows as `str`, so stores can be queried with plain string slices.
///
/// # Example
///
/// ```rust
/// use understory_option::Key;
///
/// const COLOR: Key = Key::new("color");
///
/// assert_eq!(COLOR.as_str(), "color");
/// assert_eq!(Key::owned(String::from("color")), COLOR);
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Cow<'static, str>);

impl Key {
    /// Creates a key from a static name.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key that owns its name.
    #[must_use]
    pub fn owned(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the name of this key.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::owned(name)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
