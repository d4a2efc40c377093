use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Where a marker sits relative to its bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
    #[default]
    InBar,
}

/// Glyph drawn for a marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
    #[default]
    Circle,
    Square,
}

/// A chart annotation as delivered by the backend or the push feed.
///
/// Every field is optional on the wire; entries without a `time` are dropped
/// by the marker aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMarker {
    #[serde(default, deserialize_with = "super::lenient::opt_i64_lenient")]
    pub time: Option<i64>,

    #[serde(default)]
    pub position: Option<MarkerPosition>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub shape: Option<MarkerShape>,

    #[serde(default)]
    pub text: Option<String>,
}

impl RawMarker {
    pub fn new(time: i64, text: impl Into<String>) -> Self {
        Self {
            time: Some(time),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Parse a JSON array of markers, skipping entries that do not parse.
    ///
    /// Anything other than an array is a malformed payload, so the caller can
    /// keep the markers it already has.
    pub fn parse_lenient(value: &serde_json::Value) -> Result<Vec<RawMarker>, CoreError> {
        let items = value.as_array().ok_or_else(|| {
            CoreError::MalformedPayload(format!("expected a marker array, got {}", json_kind(value)))
        })?;
        Ok(items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect())
    }
}

/// A normalized marker: time in epoch seconds, text defaulted to empty.
///
/// Identity for deduplication is `(time, text)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub time: i64,
    pub position: MarkerPosition,
    pub color: String,
    pub shape: MarkerShape,
    pub text: String,
}

impl Marker {
    pub fn key(&self) -> (i64, &str) {
        (self.time, self.text.as_str())
    }
}

impl From<Marker> for RawMarker {
    fn from(marker: Marker) -> Self {
        Self {
            time: Some(marker.time),
            position: Some(marker.position),
            color: Some(marker.color),
            shape: Some(marker.shape),
            text: Some(marker.text),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
