// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-label options of a chart: the top-level label and named labels.

use indexmap::IndexMap;
use understory_cascade::{Cascade, Lookup};
use understory_option::{FromValue, OptionStore, Value};
use understory_scriptable::{
    ChartHandle, Context, NativeContext, Resolver, ScriptValue, Scriptable, dispatch,
};

use crate::error::DataLabelsError;
use crate::event::Event;
use crate::item::LabelItem;
use crate::properties::{FORMATTER, LISTENERS, merged_native, resolve_by_name};

/// Key of the nested container holding named labels.
pub const LABELS: &str = "labels";

/// The data-label options of one chart.
///
/// The top-level options describe the default label of every element. Named
/// labels add more labels per element; each inherits every option it does not
/// set from the top-level options, then from the chart's defaults.
///
/// # Example
///
/// ```rust
/// use understory_datalabels::properties::{ALIGN, COLOR};
/// use understory_datalabels::{Align, DataLabelsOptions, Defaults};
/// use understory_option::Value;
/// use understory_scriptable::{ChartHandle, ChartKind, ColorValue, NativeContext};
///
/// let defaults = Defaults::new();
/// let mut options = defaults.options(ChartKind::Bar).unwrap();
/// options.item_mut().set(COLOR, ColorValue::from("navy"));
/// options.insert_label("title").unwrap().set(ALIGN, Align::Top);
///
/// let mut chart = ChartHandle::new("sales", ChartKind::Bar).unwrap();
/// chart.push_values(vec![3.0, 5.0]).unwrap();
/// let at = NativeContext::at(0, 1);
///
/// // The label sets its own alignment and inherits the color.
/// assert_eq!(options.resolve(Some("title"), "align", Some(&chart), &at).unwrap(), Value::from("top"));
/// assert_eq!(options.resolve(Some("title"), "color", Some(&chart), &at).unwrap(), Value::from("navy"));
/// assert_eq!(options.format(None, Some(&chart), &at).unwrap(), "5");
/// ```
#[derive(Clone, Debug)]
pub struct DataLabelsOptions {
    item: LabelItem,
    labels: IndexMap<String, LabelItem>,
    /// Bumped when labels are added or removed.
    structure: u64,
}

impl DataLabelsOptions {
    /// Creates empty options resolving against `cascade`.
    #[must_use]
    pub fn new(cascade: Cascade) -> Self {
        Self {
            item: LabelItem::new(cascade),
            labels: IndexMap::new(),
            structure: 0,
        }
    }

    /// Reads options from the engine's native object.
    ///
    /// Named labels are read from the nested `labels` object. Callback
    /// placeholders are skipped.
    pub fn from_native(
        cascade: Cascade,
        native: &serde_json::Value,
    ) -> Result<Self, DataLabelsError> {
        let Some(object) = native.as_object() else {
            return Err(DataLabelsError::NotAnObject {
                what: "data label options",
            });
        };
        let mut top = object.clone();
        let labels = top.remove(LABELS);
        let mut options = Self {
            item: LabelItem::with_options(
                cascade.clone(),
                OptionStore::from_native(&serde_json::Value::Object(top)),
            ),
            labels: IndexMap::new(),
            structure: 0,
        };
        match labels {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::Object(labels)) => {
                for (id, label) in labels {
                    if !label.is_object() {
                        return Err(DataLabelsError::NotAnObject { what: "a label" });
                    }
                    if id.is_empty() {
                        return Err(DataLabelsError::EmptyLabelId);
                    }
                    let item =
                        LabelItem::with_options(cascade.clone(), OptionStore::from_native(&label));
                    options.labels.insert(id, item);
                }
            }
            Some(_) => return Err(DataLabelsError::NotAnObject { what: "labels" }),
        }
        Ok(options)
    }

    /// Returns the top-level options.
    #[must_use]
    #[inline]
    pub fn item(&self) -> &LabelItem {
        &self.item
    }

    /// Returns the top-level options for edits.
    #[inline]
    pub fn item_mut(&mut self) -> &mut LabelItem {
        &mut self.item
    }

    /// Returns a named label.
    ///
    /// The label's own getters only see its own values and the chart
    /// defaults; resolve through [`DataLabelsOptions`] to inherit the
    /// top-level options.
    #[must_use]
    pub fn label(&self, id: &str) -> Option<&LabelItem> {
        self.labels.get(id)
    }

    /// Returns a named label for edits.
    pub fn label_mut(&mut self, id: &str) -> Option<&mut LabelItem> {
        self.labels.get_mut(id)
    }

    /// Returns the named label `id`, creating it empty if needed.
    pub fn insert_label(
        &mut self,
        id: impl Into<String>,
    ) -> Result<&mut LabelItem, DataLabelsError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DataLabelsError::EmptyLabelId);
        }
        let cascade = self.item.cascade().clone();
        let structure = &mut self.structure;
        Ok(self.labels.entry(id).or_insert_with(|| {
            *structure = structure.wrapping_add(1);
            LabelItem::new(cascade)
        }))
    }

    /// Removes a named label. Returns `true` if it existed.
    pub fn remove_label(&mut self, id: &str) -> bool {
        let Some(removed) = self.labels.shift_remove(id) else {
            return false;
        };
        // The removed label's edits stay counted so the revision never repeats.
        self.structure = self
            .structure
            .wrapping_add(removed.options().revision())
            .wrapping_add(1);
        true
    }

    /// Returns the named label identifiers, in insertion order.
    pub fn label_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.keys().map(String::as_str)
    }

    /// Returns a lookup for the top-level options (`None`) or a named label.
    pub fn lookup(&self, label: Option<&str>) -> Result<Lookup<'_>, DataLabelsError> {
        match label {
            None => Ok(self.item.lookup()),
            Some(id) => Ok(self.named(id)?.lookup().with_overlay(self.item.options())),
        }
    }

    /// Reads the literal view of an option for the top-level options or a
    /// named label. Callbacks are not run.
    pub fn get<T: ScriptValue + FromValue>(
        &self,
        label: Option<&str>,
        option: Scriptable<T>,
    ) -> Result<Option<T>, DataLabelsError> {
        Ok(T::from_value(&self.resolver(label)?.literal(option)))
    }

    /// Resolves the option called `key` for the element `native` points at.
    ///
    /// `formatter` resolves to the label text.
    pub fn resolve(
        &self,
        label: Option<&str>,
        key: &str,
        chart: Option<&ChartHandle>,
        native: &NativeContext,
    ) -> Result<Value, DataLabelsError> {
        let ctx = Context::from_native(chart, native)?;
        resolve_by_name(self.lookup(label)?, key, &ctx).ok_or_else(|| {
            DataLabelsError::UnknownOption {
                key: key.to_owned(),
            }
        })
    }

    /// Resolves a typed option for an already built context.
    pub fn resolve_with<T: ScriptValue>(
        &self,
        label: Option<&str>,
        option: Scriptable<T>,
        ctx: &Context<'_>,
    ) -> Result<Value, DataLabelsError> {
        Ok(self.resolver(label)?.resolve(option, ctx))
    }

    /// Produces the label text for the element `native` points at.
    pub fn format(
        &self,
        label: Option<&str>,
        chart: Option<&ChartHandle>,
        native: &NativeContext,
    ) -> Result<String, DataLabelsError> {
        let ctx = Context::from_native(chart, native)?;
        let raw = ctx.raw_value().unwrap_or_default();
        Ok(self.resolver(label)?.format(FORMATTER, &ctx, &raw))
    }

    /// Dispatches `event` at the element `native` points at.
    ///
    /// Handlers cascade like options: a named label's own handler, then the
    /// top-level one, then those in the chart, plugin, and global defaults.
    /// Returns the handler's answer, or `true` when no handler runs.
    pub fn dispatch(
        &self,
        label: Option<&str>,
        event: Event,
        chart: Option<&ChartHandle>,
        native: &NativeContext,
    ) -> Result<bool, DataLabelsError> {
        let ctx = Context::from_native(chart, native)?;
        let own = match label {
            Some(id) => self.named(id)?.options(),
            None => self.item.options(),
        };
        let lookup = self.lookup(label)?;
        let handler = lookup.nested_callback(LISTENERS, event.as_str());
        let ctx = ctx.with_options(own);
        Ok(dispatch(handler, &ctx))
    }

    /// Exports the options the way the engine receives them.
    ///
    /// Every option carries its resolved literal with defaults merged in.
    /// Where a callback applies, from any level, the option is a
    /// `{"__scriptable__": "<key>"}` placeholder the engine resolves through
    /// [`DataLabelsOptions::resolve`]. Named labels are merged over the
    /// top-level options and nested under `labels`.
    #[must_use]
    pub fn to_merged_native(&self) -> serde_json::Value {
        let mut native = merged_native(self.item.lookup());
        if !self.labels.is_empty()
            && let serde_json::Value::Object(object) = &mut native
        {
            let labels = self
                .labels
                .iter()
                .map(|(id, label)| {
                    let lookup = label.lookup().with_overlay(self.item.options());
                    (id.clone(), merged_native(lookup))
                })
                .collect();
            object.insert(LABELS.to_owned(), serde_json::Value::Object(labels));
        }
        native
    }

    /// Exports only the values set on these options as a native (JSON)
    /// object, with named labels nested under `labels`.
    #[must_use]
    pub fn to_native(&self) -> serde_json::Value {
        let mut native = self.item.to_native();
        if !self.labels.is_empty()
            && let serde_json::Value::Object(object) = &mut native
        {
            let labels = self
                .labels
                .iter()
                .map(|(id, label)| (id.clone(), label.to_native()))
                .collect();
            object.insert(LABELS.to_owned(), serde_json::Value::Object(labels));
        }
        native
    }

    /// Returns a counter that changes whenever any option or label changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.labels
            .values()
            .fold(self.item.options().revision(), |revision, label| {
                revision.wrapping_add(label.options().revision())
            })
            .wrapping_add(self.structure)
    }

    fn named(&self, id: &str) -> Result<&LabelItem, DataLabelsError> {
        self.labels
            .get(id)
            .ok_or_else(|| DataLabelsError::UnknownLabel { id: id.to_owned() })
    }

    fn resolver(&self, label: Option<&str>) -> Result<Resolver<'_>, DataLabelsError> {
        Ok(Resolver::new(self.lookup(label)?))
    }
}
