//! Structured inter-stage contracts.
//!
//! Every documented key is optional. The LLM may omit keys, send `null`, send a
//! number where text was documented, or add keys of its own; none of that is an
//! error. Unknown keys land in each record's `extra` map and are persisted.

pub mod company_brief;
pub mod edit_plan;
pub mod job_profile;

pub use company_brief::CompanyBrief;
pub use edit_plan::EditPlan;
pub use job_profile::JobProfile;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserializes an optional text field, stringifying scalars.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(scalar_text(&other)),
    })
}

/// Deserializes an optional nested record. A bare string becomes the record's
/// main text; anything else that does not fit is dropped.
pub(crate) fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + From<String>,
{
    Ok(record_from_value(Value::deserialize(deserializer)?))
}

/// Deserializes a list of nested records with the same rules as
/// [`lenient_record`]. A lone record or string becomes a one-item list.
pub(crate) fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + From<String>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(record_from_value).collect(),
        other => record_from_value(other).into_iter().collect(),
    })
}

fn record_from_value<T>(value: Value) -> Option<T>
where
    T: DeserializeOwned + From<String>,
{
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(T::from(s)),
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A list the model was asked to fill with strings.
///
/// Items are stored exactly as received so the persisted artifact matches the
/// model's output; [`TextList::texts`] renders them for prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TextList(Vec<Value>);

impl TextList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Items as text. Non-string items render as compact JSON.
    pub fn texts(&self) -> impl Iterator<Item = String> + '_ {
        self.0.iter().map(scalar_text)
    }

    /// The first `max` items joined with `", "`.
    pub fn join(&self, max: usize) -> String {
        self.texts().take(max).collect::<Vec<_>>().join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for TextList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| Value::String(s.into())).collect())
    }
}

/// `null` becomes empty, a lone value a one-item list.
impl<'de> Deserialize<'de> for TextList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(match Value::deserialize(deserializer)? {
            Value::Null => Vec::new(),
            Value::Array(items) => items.into_iter().filter(|v| !v.is_null()).collect(),
            Value::String(s) if s.trim().is_empty() => Vec::new(),
            other => vec![other],
        }))
    }
}

/// Truncates to at most `max` characters, appending an ellipsis when cut.
pub fn digest(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// Truncates to at most `max` characters without an ellipsis.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
