// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased callback storage.
//!
//! This module provides [`CallbackHandle`], which lets an option store keep
//! user callbacks of any signature next to plain literals. The typed view is
//! recovered by whoever knows the expected signature (see `understory_scriptable`).

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased user callback.
///
/// The handle is what a store keeps for an option whose value is computed at
/// render time. Cloning a handle shares the callback.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use understory_option::CallbackHandle;
///
/// type Doubler = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
///
/// let handle = CallbackHandle::new::<Doubler>(Arc::new(|v| v * 2.0));
/// assert!(handle.is::<Doubler>());
///
/// let f = handle.downcast_ref::<Doubler>().unwrap();
/// assert_eq!(f(2.0), 4.0);
/// ```
#[derive(Clone)]
pub struct CallbackHandle {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CallbackHandle {
    /// Wraps a callback.
    #[must_use]
    pub fn new<F: Send + Sync + 'static>(callback: F) -> Self {
        Self {
            inner: Arc::new(callback),
            type_id: TypeId::of::<F>(),
            type_name: type_name::<F>(),
        }
    }

    /// Returns the [`TypeId`] of the wrapped callback.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the wrapped callback, for diagnostics.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the wrapped callback is of type `F`.
    #[must_use]
    #[inline]
    pub fn is<F: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<F>()
    }

    /// Attempts to downcast to a reference of type `F`.
    ///
    /// Returns `None` if the wrapped callback is not of type `F`.
    #[must_use]
    pub fn downcast_ref<F: 'static>(&self) -> Option<&F> {
        self.inner.downcast_ref()
    }

    /// Returns `true` if both handles share the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for CallbackHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHandle")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Check = Arc<dyn Fn(u32) -> bool + Send + Sync>;

    #[test]
    fn downcast_to_wrapped_type() {
        let handle = CallbackHandle::new::<Check>(Arc::new(|v| v > 2));
        assert!(handle.is::<Check>());
        assert!(!handle.is::<u32>());
        assert_eq!(handle.downcast_ref::<u32>(), None);
        let f = handle.downcast_ref::<Check>().unwrap();
        assert!(f(3));
        assert!(!f(1));
    }

    #[test]
    fn clones_share_the_callback() {
        let handle = CallbackHandle::new::<Check>(Arc::new(|_| true));
        let clone = handle.clone();
        assert_eq!(handle, clone);
        assert_eq!(handle.type_id(), clone.type_id());

        let other = CallbackHandle::new::<Check>(Arc::new(|_| true));
        assert_ne!(handle, other);
    }

    #[test]
    fn debug_names_the_type() {
        let handle = CallbackHandle::new(7_u8);
        let debug = format!("{handle:?}");
        assert!(debug.contains("CallbackHandle"));
        assert!(debug.contains("u8"));
    }
}
