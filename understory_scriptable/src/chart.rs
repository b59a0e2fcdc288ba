// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart a context points into.

use std::fmt;

use serde::{Deserialize, Serialize};
use understory_option::{OptionStore, Value};

use crate::error::ScriptableError;

/// The type of a chart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    /// Bar chart.
    Bar,
    /// Line chart.
    Line,
    /// Pie chart.
    Pie,
    /// Doughnut chart.
    Doughnut,
    /// Polar area chart.
    PolarArea,
    /// Radar chart.
    Radar,
    /// Scatter chart.
    Scatter,
    /// Bubble chart.
    Bubble,
    /// Geographic choropleth map.
    Choropleth,
    /// Geographic bubble map.
    BubbleMap,
}

impl ChartKind {
    /// Returns the engine's name for this chart type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::PolarArea => "polarArea",
            Self::Radar => "radar",
            Self::Scatter => "scatter",
            Self::Bubble => "bubble",
            Self::Choropleth => "choropleth",
            Self::BubbleMap => "bubbleMap",
        }
    }

    /// Returns `true` for map charts, whose datasets hold features instead of values.
    #[must_use]
    pub const fn is_geographic(self) -> bool {
        matches!(self, Self::Choropleth | Self::BubbleMap)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A data point of a geographic dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFeature {
    /// Name of the mapped feature (country, state, ...).
    pub name: String,
    /// The value plotted for the feature.
    pub value: f64,
}

impl GeoFeature {
    /// Creates a feature data point.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The data of one dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum DatasetData {
    /// Plain numeric values.
    Values(Vec<f64>),
    /// Geographic feature values.
    Features(Vec<GeoFeature>),
}

impl DatasetData {
    /// Returns the number of data points.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Values(values) => values.len(),
            Self::Features(features) => features.len(),
        }
    }

    /// Returns `true` if the dataset has no data points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The chart a resolution context refers to.
///
/// # Example
///
/// ```rust
/// use understory_scriptable::{ChartHandle, ChartKind, GeoFeature};
///
/// let mut map = ChartHandle::new("population", ChartKind::Choropleth).unwrap();
/// assert!(map.push_values(vec![1.0]).is_err());
/// assert_eq!(map.push_features(vec![GeoFeature::new("Italy", 59.0)]).unwrap(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct ChartHandle {
    id: String,
    kind: ChartKind,
    datasets: Vec<DatasetData>,
}

impl ChartHandle {
    /// Creates a chart handle.
    ///
    /// Fails if `id` is empty.
    pub fn new(id: impl Into<String>, kind: ChartKind) -> Result<Self, ScriptableError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ScriptableError::MissingArgument { argument: "id" });
        }
        Ok(Self {
            id,
            kind,
            datasets: Vec::new(),
        })
    }

    /// Returns the chart identifier.
    #[must_use]
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the chart type.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Returns the datasets.
    #[must_use]
    pub fn datasets(&self) -> &[DatasetData] {
        &self.datasets
    }

    /// Returns one dataset.
    #[must_use]
    pub fn dataset(&self, index: usize) -> Option<&DatasetData> {
        self.datasets.get(index)
    }

    /// Adds a dataset of plain values and returns its index.
    ///
    /// Map charts reject plain values; use [`ChartHandle::push_features`].
    pub fn push_values(&mut self, values: Vec<f64>) -> Result<usize, ScriptableError> {
        if self.kind.is_geographic() {
            return Err(ScriptableError::Unsupported {
                operation: "push_values",
                alternative: "push_features",
                kind: self.kind,
            });
        }
        self.datasets.push(DatasetData::Values(values));
        Ok(self.datasets.len() - 1)
    }

    /// Adds a dataset of geographic features and returns its index.
    ///
    /// Only map charts accept features; use [`ChartHandle::push_values`] otherwise.
    pub fn push_features(&mut self, features: Vec<GeoFeature>) -> Result<usize, ScriptableError> {
        if !self.kind.is_geographic() {
            return Err(ScriptableError::Unsupported {
                operation: "push_features",
                alternative: "push_values",
                kind: self.kind,
            });
        }
        self.datasets.push(DatasetData::Features(features));
        Ok(self.datasets.len() - 1)
    }

    /// Returns the raw data point at (`dataset`, `index`).
    ///
    /// Features are returned as `{ feature, value }` objects.
    #[must_use]
    pub fn raw_value(&self, dataset: usize, index: usize) -> Option<Value> {
        match self.datasets.get(dataset)? {
            DatasetData::Values(values) => values.get(index).copied().map(Value::Number),
            DatasetData::Features(features) => features.get(index).map(|f| {
                let mut point = OptionStore::new();
                point.set("feature", f.name.as_str());
                point.set("value", f.value);
                Value::Object(point)
            }),
        }
    }
}
