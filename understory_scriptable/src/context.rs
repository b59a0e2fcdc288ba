// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution contexts.
//!
//! The engine describes the element being drawn with a small native object
//! ([`NativeContext`]). A [`Context`] is built from it for every single
//! resolution and handed to user callbacks; it is never cached.

use serde::Deserialize;
use understory_option::{OptionStore, Value};

use crate::chart::ChartHandle;
use crate::error::ScriptableError;

/// The engine's context object, as received at render time.
///
/// Negative indices are the engine's way of saying "undefined".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeContext {
    /// Index of the dataset the element belongs to.
    pub dataset_index: Option<i64>,
    /// Index of the element within its dataset.
    pub data_index: Option<i64>,
    /// Whether the element is hovered or otherwise active.
    pub active: Option<bool>,
}

impl NativeContext {
    /// Creates a native context pointing at one element.
    #[must_use]
    pub fn at(dataset_index: usize, data_index: usize) -> Self {
        Self {
            dataset_index: i64::try_from(dataset_index).ok(),
            data_index: i64::try_from(data_index).ok(),
            active: None,
        }
    }

    /// Reads a native context from the engine's JSON object.
    pub fn from_native(native: &serde_json::Value) -> Result<Self, ScriptableError> {
        Ok(Self::deserialize(native)?)
    }
}

/// The typed context handed to scriptable callbacks.
///
/// A context is *consistent* when both the dataset index and the data index
/// are defined. Callbacks only ever see consistent contexts.
///
/// # Example
///
/// ```rust
/// use understory_scriptable::{ChartHandle, ChartKind, Context, NativeContext};
///
/// let chart = ChartHandle::new("sales", ChartKind::Bar).unwrap();
///
/// let ctx = Context::from_native(Some(&chart), &NativeContext::at(0, 3)).unwrap();
/// assert!(ctx.is_consistent());
/// assert!(ctx.is_active());
///
/// let partial = NativeContext { dataset_index: Some(0), data_index: Some(-1), active: None };
/// let ctx = Context::from_native(Some(&chart), &partial).unwrap();
/// assert!(!ctx.is_consistent());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    chart: &'a ChartHandle,
    dataset_index: Option<usize>,
    data_index: Option<usize>,
    active: bool,
    options: Option<&'a OptionStore>,
}

impl<'a> Context<'a> {
    /// Creates an active context for the element at the given indices.
    #[must_use]
    pub fn new(
        chart: &'a ChartHandle,
        dataset_index: Option<usize>,
        data_index: Option<usize>,
    ) -> Self {
        Self {
            chart,
            dataset_index,
            data_index,
            active: true,
            options: None,
        }
    }

    /// Builds a context from the engine's native context.
    ///
    /// Fails if there is no chart to resolve against. An absent `active`
    /// flag means active.
    pub fn from_native(
        chart: Option<&'a ChartHandle>,
        native: &NativeContext,
    ) -> Result<Self, ScriptableError> {
        let chart = chart.ok_or(ScriptableError::MissingArgument { argument: "chart" })?;
        let index = |i: Option<i64>| i.and_then(|i| usize::try_from(i).ok());
        Ok(Self {
            chart,
            dataset_index: index(native.dataset_index),
            data_index: index(native.data_index),
            active: native.active.unwrap_or(true),
            options: None,
        })
    }

    /// Returns a copy with the active flag set.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns a copy referring to the options being resolved.
    #[must_use]
    pub fn with_options(mut self, options: &'a OptionStore) -> Self {
        self.options = Some(options);
        self
    }

    /// Returns the chart.
    #[must_use]
    #[inline]
    pub fn chart(&self) -> &'a ChartHandle {
        self.chart
    }

    /// Returns the dataset index, if defined.
    #[must_use]
    #[inline]
    pub fn dataset_index(&self) -> Option<usize> {
        self.dataset_index
    }

    /// Returns the data index, if defined.
    #[must_use]
    #[inline]
    pub fn data_index(&self) -> Option<usize> {
        self.data_index
    }

    /// Returns `true` if the element is active.
    #[must_use]
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the options being resolved, when known.
    #[must_use]
    #[inline]
    pub fn options(&self) -> Option<&'a OptionStore> {
        self.options
    }

    /// Returns `true` if both indices are defined.
    #[must_use]
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.dataset_index.is_some() && self.data_index.is_some()
    }

    /// Returns the raw data point this context points at.
    #[must_use]
    pub fn raw_value(&self) -> Option<Value> {
        self.chart
            .raw_value(self.dataset_index?, self.data_index?)
    }
}
