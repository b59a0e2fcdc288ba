// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared default scopes for data labels.

use std::sync::Arc;

use hashbrown::HashMap;
use serde::Deserialize;
use understory_cascade::{Cascade, DefaultsScope, ScopeLevel};
use understory_option::{FromValue, Value};
use understory_scriptable::ChartKind;

use crate::enums::{Align, Anchor, FontStyle, FontWeight, TextAlign};
use crate::error::DataLabelsError;
use crate::font::Font;
use crate::options::DataLabelsOptions;
use crate::padding::Padding;
use crate::properties::{
    ALIGN, ANCHOR, BACKGROUND_COLOR, BORDER_COLOR, BORDER_RADIUS, BORDER_WIDTH, CLAMP, CLIP,
    COLOR, DISPLAY, FONT, FORMATTER, NAMES, OFFSET, OPACITY, PADDING, ROTATION, TEXT_ALIGN,
    TEXT_SHADOW_BLUR, TEXT_SHADOW_COLOR, TEXT_STROKE_COLOR, TEXT_STROKE_WIDTH,
};

const DEFAULT_FONT_FAMILY: &str = "'Helvetica Neue', 'Helvetica', 'Arial', sans-serif";
const DEFAULT_COLOR: &str = "#666";

/// Returns the hard-coded defaults every data-label option falls back to.
///
/// Text stroke and shadow colors follow the text color.
#[must_use]
pub fn builtin_scope() -> DefaultsScope {
    DefaultsScope::builder(ScopeLevel::BuiltIn)
        .set(ALIGN.name(), Align::Center)
        .set(ANCHOR.name(), Anchor::Center)
        .set(BACKGROUND_COLOR.name(), Value::Null)
        .set(BORDER_COLOR.name(), Value::Null)
        .set(BORDER_RADIUS.name(), 0.0)
        .set(BORDER_WIDTH.name(), 0_u32)
        .set(CLAMP.name(), false)
        .set(CLIP.name(), false)
        .set(COLOR.name(), DEFAULT_COLOR)
        .set(DISPLAY.name(), true)
        .set(FONT.name(), EngineFont::default().to_font())
        .set(FORMATTER.name(), Value::Null)
        .set(OFFSET.name(), 4.0)
        .set(OPACITY.name(), 1.0)
        .set(PADDING.name(), Padding::uniform(4.0))
        .set(ROTATION.name(), 0.0)
        .set(TEXT_ALIGN.name(), TextAlign::Start)
        .same_as(TEXT_STROKE_COLOR.name(), COLOR.name())
        .set(TEXT_STROKE_WIDTH.name(), 0_u32)
        .set(TEXT_SHADOW_BLUR.name(), 0.0)
        .same_as(TEXT_SHADOW_COLOR.name(), COLOR.name())
        .build()
}

/// The engine's global font defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineFont {
    /// CSS font-family list.
    pub family: String,
    /// Size in pixels.
    pub size: f64,
    /// CSS font style.
    pub style: String,
    /// CSS font weight, as a keyword or a number.
    pub weight: Option<serde_json::Value>,
    /// Line height, as a multiple of the size.
    pub line_height: f64,
}

impl Default for EngineFont {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_owned(),
            size: 12.0,
            style: FontStyle::Normal.as_str().to_owned(),
            weight: None,
            line_height: 1.2,
        }
    }
}

impl EngineFont {
    /// Converts to a label font. Unknown style or weight keywords are unset.
    #[must_use]
    pub fn to_font(&self) -> Font {
        Font {
            family: Some(self.family.clone()),
            size: Some(self.size),
            style: FontStyle::parse(&self.style),
            weight: self
                .weight
                .as_ref()
                .map(Value::from_native)
                .and_then(|weight| FontWeight::from_value(&weight)),
            line_height: Some(self.line_height),
        }
    }
}

/// The engine's global defaults that data labels read.
///
/// # Example
///
/// ```rust
/// use understory_datalabels::EngineDefaults;
///
/// let engine = EngineDefaults::from_json(r##"{ "color": "#222", "font": { "size": 14 } }"##).unwrap();
/// assert_eq!(engine.color, "#222");
/// assert_eq!(engine.font.size, 14.0);
/// assert_eq!(engine.font.line_height, 1.2);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineDefaults {
    /// Default text color.
    pub color: String,
    /// Default font.
    pub font: EngineFont,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_owned(),
            font: EngineFont::default(),
        }
    }
}

impl EngineDefaults {
    /// Parses engine defaults from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, DataLabelsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads engine defaults from a native object.
    pub fn from_native(native: &serde_json::Value) -> Result<Self, DataLabelsError> {
        Ok(Self::deserialize(native)?)
    }

    /// Returns these defaults as a global scope.
    #[must_use]
    pub fn to_scope(&self) -> DefaultsScope {
        DefaultsScope::builder(ScopeLevel::Global)
            .set(COLOR.name(), self.color.as_str())
            .set(FONT.name(), self.font.to_font())
            .build()
    }
}

/// Every default scope data labels resolve against.
///
/// Scopes are shared: each [`Cascade`] handed out refers to the same
/// scopes. Replacing a scope affects cascades built afterwards only.
///
/// # Example
///
/// ```rust
/// use understory_cascade::{DefaultsScope, ScopeLevel};
/// use understory_datalabels::Defaults;
/// use understory_datalabels::properties::OFFSET;
/// use understory_scriptable::ChartKind;
///
/// let mut defaults = Defaults::new();
/// defaults
///     .set_chart(
///         ChartKind::Pie,
///         DefaultsScope::builder(ScopeLevel::Chart).set("offset", 0.0).build(),
///     )
///     .unwrap();
///
/// let pie = defaults.options(ChartKind::Pie).unwrap();
/// let bar = defaults.options(ChartKind::Bar).unwrap();
/// assert_eq!(pie.item().get(OFFSET), Some(0.0));
/// assert_eq!(bar.item().get(OFFSET), Some(4.0));
/// ```
#[derive(Clone, Debug)]
pub struct Defaults {
    builtin: Arc<DefaultsScope>,
    global: Arc<DefaultsScope>,
    plugin: Arc<DefaultsScope>,
    charts: HashMap<ChartKind, Arc<DefaultsScope>>,
    strict: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self::new()
    }
}

impl Defaults {
    /// Creates the built-in defaults and the engine's stock global defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builtin: Arc::new(builtin_scope()),
            global: Arc::new(EngineDefaults::default().to_scope()),
            plugin: Arc::new(DefaultsScope::empty(ScopeLevel::Plugin)),
            charts: HashMap::new(),
            strict: false,
        }
    }

    /// Replaces the global scope with the engine's defaults.
    #[must_use]
    pub fn with_engine(mut self, engine: &EngineDefaults) -> Self {
        self.global = Arc::new(engine.to_scope());
        self
    }

    /// Makes cascades panic on options without any default.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replaces the global scope.
    pub fn set_global(&mut self, scope: DefaultsScope) -> Result<&mut Self, DataLabelsError> {
        self.global = Arc::new(expect_level(scope, ScopeLevel::Global)?);
        Ok(self)
    }

    /// Replaces the plugin-wide scope.
    pub fn set_plugin(&mut self, scope: DefaultsScope) -> Result<&mut Self, DataLabelsError> {
        self.plugin = Arc::new(expect_level(scope, ScopeLevel::Plugin)?);
        Ok(self)
    }

    /// Replaces the scope for charts of `kind`.
    pub fn set_chart(
        &mut self,
        kind: ChartKind,
        scope: DefaultsScope,
    ) -> Result<&mut Self, DataLabelsError> {
        let scope = expect_level(scope, ScopeLevel::Chart)?;
        self.charts.insert(kind, Arc::new(scope));
        Ok(self)
    }

    /// Returns the scope at `level`; chart scopes are per kind.
    #[must_use]
    pub fn scope(&self, level: ScopeLevel, kind: ChartKind) -> Option<&DefaultsScope> {
        match level {
            ScopeLevel::BuiltIn => Some(&*self.builtin),
            ScopeLevel::Global => Some(&*self.global),
            ScopeLevel::Plugin => Some(&*self.plugin),
            ScopeLevel::Chart => self.charts.get(&kind).map(|s| &**s),
            ScopeLevel::Item => None,
        }
    }

    /// Builds the cascade for charts of `kind`.
    pub fn cascade(&self, kind: ChartKind) -> Result<Cascade, DataLabelsError> {
        let mut builder = Cascade::builder()
            .push_shared(Arc::clone(&self.builtin))
            .push_shared(Arc::clone(&self.global))
            .push_shared(Arc::clone(&self.plugin))
            .strict(self.strict);
        if let Some(chart) = self.charts.get(&kind) {
            builder = builder.push_shared(Arc::clone(chart));
        }
        Ok(builder.build()?)
    }

    /// Creates empty data-label options for a chart of `kind`.
    pub fn options(&self, kind: ChartKind) -> Result<DataLabelsOptions, DataLabelsError> {
        Ok(DataLabelsOptions::new(self.cascade(kind)?))
    }

    /// Lists the data-label options with no global or built-in default.
    pub fn audit(&self, kind: ChartKind) -> Result<Vec<&'static str>, DataLabelsError> {
        Ok(self.cascade(kind)?.missing_global_defaults(NAMES))
    }
}

fn expect_level(
    scope: DefaultsScope,
    expected: ScopeLevel,
) -> Result<DefaultsScope, DataLabelsError> {
    if scope.level() == expected {
        Ok(scope)
    } else {
        Err(DataLabelsError::ScopeLevel {
            expected,
            actual: scope.level(),
        })
    }
}
