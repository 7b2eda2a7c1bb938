//! Job profile: structured facts extracted from a job posting.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient_string, TextList};

/// Output of the job-analysis stage. Field order is the persisted key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub company_website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// remote | hybrid | onsite | unknown
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<String>,
    /// junior | mid | senior | lead | manager | unknown
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub seniority_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,

    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub required_skills: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub preferred_skills: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub technologies: TextList,

    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub key_responsibilities: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub must_haves: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub nice_to_haves: TextList,

    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub ats_keywords: TextList,
    /// startup | corporate | academic | nonprofit | unknown
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// The locator the profile was built from, echoed back by the analyzer.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobProfile {
    pub fn title_or(&self, default: &'static str) -> &str {
        non_blank(&self.job_title).unwrap_or(default)
    }

    pub fn company_or(&self, default: &'static str) -> &str {
        non_blank(&self.company_name).unwrap_or(default)
    }

    /// Company name when known; `None` for missing or blank.
    pub fn company(&self) -> Option<&str> {
        non_blank(&self.company_name)
    }

    pub fn website(&self) -> Option<&str> {
        non_blank(&self.company_website)
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_profile_deserializes() {
        let json = r#"{
            "job_title": "Senior Rust Engineer",
            "company_name": "Ferrous Systems",
            "company_website": "ferrous.example",
            "location": "Berlin",
            "remote_policy": "hybrid",
            "seniority_level": "senior",
            "salary_range": null,
            "employment_type": "full-time",
            "required_skills": ["Rust", "Tokio"],
            "preferred_skills": ["Kubernetes"],
            "technologies": ["Rust", "PostgreSQL"],
            "key_responsibilities": ["Own the storage engine"],
            "must_haves": ["5+ years systems programming"],
            "nice_to_haves": ["Open source contributions"],
            "ats_keywords": ["Rust", "distributed systems"],
            "tone": "startup",
            "summary": "Build the storage layer."
        }"#;
        let profile: JobProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.title_or("role"), "Senior Rust Engineer");
        assert_eq!(profile.company(), Some("Ferrous Systems"));
        assert!(profile.salary_range.is_none());
        assert_eq!(profile.required_skills.texts().collect::<Vec<_>>(), ["Rust", "Tokio"]);
        assert!(profile.extra.is_empty());
    }

    #[test]
    fn test_missing_keys_default_to_unknown() {
        let profile: JobProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.title_or("Unknown"), "Unknown");
        assert_eq!(profile.company_or("Unknown"), "Unknown");
        assert!(profile.company().is_none());
        assert!(profile.ats_keywords.is_empty());
    }

    #[test]
    fn test_blank_company_is_treated_as_missing() {
        let profile: JobProfile = serde_json::from_str(r#"{"company_name": "  "}"#).unwrap();
        assert!(profile.company().is_none());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{"job_title": "SRE", "visa_sponsorship": true}"#;
        let profile: JobProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.extra["visa_sponsorship"], Value::Bool(true));

        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["visa_sponsorship"], Value::Bool(true));
        assert_eq!(out["job_title"], "SRE");
    }

    #[test]
    fn test_serialized_key_order_follows_contract() {
        let profile = JobProfile {
            summary: Some("Keep the lights on.".to_string()),
            company_name: Some("Initech".to_string()),
            job_title: Some("SRE".to_string()),
            ..Default::default()
        };
        let text = serde_json::to_string_pretty(&profile).unwrap();
        let title = text.find("\"job_title\"").unwrap();
        let company = text.find("\"company_name\"").unwrap();
        let summary = text.find("\"summary\"").unwrap();
        assert!(title < company && company < summary);
        assert!(!text.contains("null"));
        assert!(!text.contains("required_skills"));
    }
}
