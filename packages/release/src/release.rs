//! The OCDS release document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MergeError, Result};

/// One OCDS release, stored as a JSON object.
///
/// A release starts empty and is filled by applying fragments through the
/// [`MergeEngine`](crate::MergeEngine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Release(Map<String, Value>);

impl Release {
    /// Create an empty release.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build a release from a JSON value.
    ///
    /// # Errors
    /// Returns `NotAnObject` if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(MergeError::NotAnObject(value_kind(&other))),
        }
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a value by dotted path through nested objects.
    ///
    /// Entity collections are not traversed: `get("tender.lots")` returns the
    /// whole collection.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use ted_ocds_release::Release;
    ///
    /// let release = Release::from_value(json!({"tender": {"id": "T-1"}})).unwrap();
    /// assert_eq!(release.get("tender.id"), Some(&json!("T-1")));
    /// assert_eq!(release.get("tender.title"), None);
    /// ```
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Release identifier, if set.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Open Contracting ID, if set.
    #[must_use]
    pub fn ocid(&self) -> Option<&str> {
        self.0.get("ocid").and_then(Value::as_str)
    }

    /// Find an entity by id in the collection at `path`.
    #[must_use]
    pub fn entity(&self, path: &str, id: &str) -> Option<&Map<String, Value>> {
        self.get(path)?
            .as_array()?
            .iter()
            .filter_map(Value::as_object)
            .find(|entity| entity.get("id").and_then(Value::as_str) == Some(id))
    }
}

/// Human-readable name of a JSON value's kind, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
