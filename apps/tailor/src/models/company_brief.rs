use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient_string, TextList};

/// Summary used when the job profile carries no company name.
pub const RESEARCH_SKIPPED_SUMMARY: &str = "Company name not found — research skipped.";

/// Output of the company-research stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyBrief {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// startup (<50) | small (50-200) | mid (200-1000) | large (1000+) | unknown
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    /// seed | series-a | series-b | growth | public | enterprise | unknown
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub products_services: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub tech_stack: TextList,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub engineering_culture: Option<String>,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub recent_news: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub values: TextList,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub notable_facts: TextList,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompanyBrief {
    /// The single-field brief returned when there is nothing to research.
    pub fn skipped() -> Self {
        Self {
            summary: Some(RESEARCH_SKIPPED_SUMMARY.to_string()),
            ..Default::default()
        }
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn tone(&self) -> Option<&str> {
        self.tone.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
