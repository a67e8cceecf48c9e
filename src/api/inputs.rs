use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{PaletteState, TabularInput};
use crate::error::{ChartError, ChartResult};

/// Well-known host field names.
pub mod fields {
    pub const LABELS: &str = "labels";
    pub const VALUES: &str = "values";
    pub const SECONDARY_VALUES: &str = "secondaryValues";
    pub const GROUPS: &str = "groups";
    pub const COLORS: &str = "colors";
    pub const PALETTE: &str = "palette";
    pub const DEFAULT_COLOR: &str = "defaultColor";
    pub const X_VALUES: &str = "xValues";
    pub const Y_VALUES: &str = "yValues";
    pub const Z_VALUES: &str = "zValues";
    pub const ALT_X_VALUES: &str = "altXValues";
    pub const ALT_Y_VALUES: &str = "altYValues";
    pub const AXIS_ROUTING: &str = "axisRouting";
    pub const SERIES_NAMES: &str = "seriesNames";
    pub const IDS: &str = "ids";
    pub const PARENTS: &str = "parents";
    pub const ROOT_ID: &str = "rootId";
    pub const LABEL_THRESHOLD: &str = "labelThreshold";
    pub const TITLE: &str = "title";
    pub const SUBTITLE: &str = "subtitle";
    pub const X_AXIS_TITLE: &str = "xAxisTitle";
    pub const Y_AXIS_TITLE: &str = "yAxisTitle";
    pub const SECONDARY_AXIS_TITLE: &str = "secondaryAxisTitle";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const ALTERNATE_MODE: &str = "alternateMode";
    pub const TOOLTIP_FORMAT: &str = "tooltipFormat";
}

/// One named value supplied by the host's reactive state.
///
/// Deserialization is untagged, so plain JSON values map straight onto the
/// variants. Arrays made only of `null` land in `BoolArray`; the typed
/// accessors read them as absent entries of any type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    BoolArray(Vec<Option<bool>>),
    NumberArray(Vec<Option<f64>>),
    TextArray(Vec<Option<String>>),
}

impl FieldValue {
    #[must_use]
    pub fn texts<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::TextArray(values.into_iter().map(|v| Some(v.into())).collect())
    }

    #[must_use]
    pub fn numbers(values: impl IntoIterator<Item = f64>) -> Self {
        Self::NumberArray(values.into_iter().map(Some).collect())
    }

    #[must_use]
    pub fn bools(values: impl IntoIterator<Item = bool>) -> Self {
        Self::BoolArray(values.into_iter().map(Some).collect())
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::BoolArray(_) => "bool array",
            Self::NumberArray(_) => "number array",
            Self::TextArray(_) => "string array",
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Snapshot of the host's named fields for one chart instance.
///
/// Reads never fail: a missing or mistyped field reads as absent, and array
/// accessors coerce between element types where the meaning is unambiguous
/// (numeric strings to numbers, numbers to labels).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputStore {
    fields: IndexMap<String, FieldValue>,
}

impl InputStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse input fields: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Stores `value` under `name`. Returns `true` when the stored value changed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> bool {
        let name = name.into();
        let value = value.into();
        if self.fields.get(&name) == Some(&value) {
            return false;
        }
        self.fields.insert(name, value);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.shift_remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            FieldValue::Text(text) => Some(text.clone()),
            FieldValue::Number(number) => Some(format_number(*number)),
            other => mistyped(name, other, "string"),
        }
    }

    /// Non-blank text, trimmed.
    #[must_use]
    pub fn non_blank_text(&self, name: &str) -> Option<String> {
        self.text(name)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
    }

    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        let number = match self.fields.get(name)? {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
            other => mistyped(name, other, "number"),
        };
        number.filter(|value| value.is_finite())
    }

    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name)? {
            FieldValue::Bool(flag) => Some(*flag),
            other => mistyped(name, other, "bool"),
        }
    }

    #[must_use]
    pub fn texts(&self, name: &str) -> Vec<Option<String>> {
        match self.fields.get(name) {
            None => Vec::new(),
            Some(FieldValue::TextArray(values)) => values.clone(),
            Some(FieldValue::NumberArray(values)) => values
                .iter()
                .map(|value| value.map(format_number))
                .collect(),
            Some(other) => all_null(other).unwrap_or_else(|| {
                mistyped::<()>(name, other, "string array");
                Vec::new()
            }),
        }
    }

    #[must_use]
    pub fn numbers(&self, name: &str) -> Vec<Option<f64>> {
        match self.fields.get(name) {
            None => Vec::new(),
            Some(FieldValue::NumberArray(values)) => values.clone(),
            Some(FieldValue::TextArray(values)) => values
                .iter()
                .map(|value| value.as_deref().and_then(|v| v.trim().parse::<f64>().ok()))
                .collect(),
            Some(other) => all_null(other).unwrap_or_else(|| {
                mistyped::<()>(name, other, "number array");
                Vec::new()
            }),
        }
    }

    #[must_use]
    pub fn flags(&self, name: &str) -> Vec<Option<bool>> {
        match self.fields.get(name) {
            None => Vec::new(),
            Some(FieldValue::BoolArray(values)) => values.clone(),
            Some(other) => all_null(other).unwrap_or_else(|| {
                mistyped::<()>(name, other, "bool array");
                Vec::new()
            }),
        }
    }

    /// Parallel arrays for the transformation core.
    #[must_use]
    pub fn table(&self) -> TabularInput {
        TabularInput {
            labels: self.texts(fields::LABELS),
            values: self.numbers(fields::VALUES),
            secondary_values: self.numbers(fields::SECONDARY_VALUES),
            groups: self.texts(fields::GROUPS),
            colors: self.texts(fields::COLORS),
            x_values: self.numbers(fields::X_VALUES),
            y_values: self.numbers(fields::Y_VALUES),
            z_values: self.numbers(fields::Z_VALUES),
            alt_x_values: self.numbers(fields::ALT_X_VALUES),
            alt_y_values: self.numbers(fields::ALT_Y_VALUES),
        }
    }

    #[must_use]
    pub fn palette(&self) -> PaletteState {
        PaletteState {
            colors: self
                .texts(fields::PALETTE)
                .into_iter()
                .flatten()
                .filter(|color| !color.trim().is_empty())
                .collect(),
            fallback: self.non_blank_text(fields::DEFAULT_COLOR),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn all_null<T>(value: &FieldValue) -> Option<Vec<Option<T>>> {
    let len = match value {
        FieldValue::BoolArray(values) if values.iter().all(Option::is_none) => values.len(),
        FieldValue::NumberArray(values) if values.iter().all(Option::is_none) => values.len(),
        FieldValue::TextArray(values) if values.iter().all(Option::is_none) => values.len(),
        _ => return None,
    };
    Some((0..len).map(|_| None).collect())
}

fn mistyped<T>(name: &str, value: &FieldValue, expected: &str) -> Option<T> {
    debug!(
        field = name,
        found = value.kind_name(),
        expected,
        "ignoring mistyped input field"
    );
    None
}
