//! The parsed JSON payload.

use serde_json::Value;

use crate::detect::SkipReason;

/// Strictly parsed JSON whose top level is an object or an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    value: Value,
}

impl ParsedDocument {
    /// Parse `source` as strict JSON.
    ///
    /// Object keys keep the order in which they appear in `source`.
    ///
    /// # Errors
    ///
    /// [`SkipReason::InvalidJson`] if parsing fails, [`SkipReason::ScalarDocument`]
    /// if the top-level value is a string, number, boolean or null.
    pub fn parse(source: &str) -> Result<Self, SkipReason> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| SkipReason::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Wrap an already decoded value.
    ///
    /// # Errors
    ///
    /// [`SkipReason::ScalarDocument`] unless `value` is an object or array.
    pub fn from_value(value: Value) -> Result<Self, SkipReason> {
        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self { value }),
            _ => Err(SkipReason::ScalarDocument),
        }
    }

    /// The decoded value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Serialize with two-space indentation, the text offered for download.
    ///
    /// Integers are written as decoded; any other number is written through
    /// `f64`, so `1e2` becomes `100.0`.
    #[must_use]
    pub fn beautify(&self) -> String {
        // `Value` serialization cannot fail: keys are always strings.
        serde_json::to_string_pretty(&self.value).unwrap_or_default()
    }
}
