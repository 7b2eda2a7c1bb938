use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient_record, lenient_records, lenient_string, TextList};

/// Output of the strategy-planning stage: the edits the rewriter should apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub overall_strategy: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub tone_notes: Option<String>,

    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub sections_to_emphasize: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub sections_to_de_emphasize: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub section_reorder: TextList,

    #[serde(default, deserialize_with = "lenient_record", skip_serializing_if = "Option::is_none")]
    pub summary_rewrite: Option<SummaryRewrite>,

    #[serde(default, deserialize_with = "lenient_records", skip_serializing_if = "Vec::is_empty")]
    pub bullet_rewrites: Vec<BulletRewrite>,

    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub keywords_to_inject: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub skills_to_add: TextList,
    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub skills_to_remove: TextList,

    #[serde(default, deserialize_with = "lenient_records", skip_serializing_if = "Vec::is_empty")]
    pub experience_notes: Vec<ExperienceNote>,

    #[serde(default, skip_serializing_if = "TextList::is_empty")]
    pub ats_optimizations: TextList,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRewrite {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub original_hint: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub new_summary: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<String> for SummaryRewrite {
    fn from(new_summary: String) -> Self {
        Self {
            new_summary: Some(new_summary),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulletRewrite {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<String> for BulletRewrite {
    fn from(rewritten: String) -> Self {
        Self {
            rewritten: Some(rewritten),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceNote {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub company_or_role: Option<String>,
    /// emphasize | trim | remove | reorder
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<String> for ExperienceNote {
    fn from(note: String) -> Self {
        Self {
            note: Some(note),
            ..Default::default()
        }
    }
}

impl EditPlan {
    /// Best-effort count of planned changes, for progress output only.
    ///
    /// Some models emit an undocumented `section_changes` array; it is counted
    /// when present.
    pub fn planned_change_count(&self) -> usize {
        let section_changes = self
            .extra
            .get("section_changes")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        self.bullet_rewrites.len()
            + self.sections_to_emphasize.len()
            + self.sections_to_de_emphasize.len()
            + section_changes
    }

    pub fn strategy_text(&self) -> &str {
        self.overall_strategy.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_plan_deserializes_nested_records() {
        let json = r#"{
            "overall_strategy": "Lead with distributed systems work.",
            "sections_to_emphasize": ["Experience"],
            "sections_to_de_emphasize": ["Hobbies"],
            "section_reorder": ["Summary", "Experience", "Education"],
            "summary_rewrite": {"original_hint": "Engineer with", "new_summary": "Rust engineer."},
            "bullet_rewrites": [
                {"original": "Worked on caching", "rewritten": "Built a cache cutting p99 by 40%", "reason": "quantify"}
            ],
            "experience_notes": [
                {"company_or_role": "Acme", "action": "emphasize", "note": "Move up"}
            ],
            "keywords_to_inject": ["Tokio"]
        }"#;
        let plan: EditPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.bullet_rewrites.len(), 1);
        assert_eq!(
            plan.summary_rewrite.as_ref().unwrap().new_summary.as_deref(),
            Some("Rust engineer.")
        );
        assert_eq!(plan.experience_notes[0].action.as_deref(), Some("emphasize"));
        assert_eq!(plan.planned_change_count(), 3);
    }

    #[test]
    fn test_planned_change_count_includes_section_changes_when_present() {
        let json = r#"{
            "bullet_rewrites": [{"original": "a", "rewritten": "b"}],
            "section_changes": [{"section": "Skills"}, {"section": "Projects"}]
        }"#;
        let plan: EditPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.planned_change_count(), 3);
    }

    #[test]
    fn test_null_lists_default_to_empty() {
        let json = r#"{"bullet_rewrites": null, "experience_notes": null, "summary_rewrite": null}"#;
        let plan: EditPlan = serde_json::from_str(json).unwrap();
        assert!(plan.bullet_rewrites.is_empty());
        assert!(plan.summary_rewrite.is_none());
        assert_eq!(plan.planned_change_count(), 0);
        assert_eq!(plan.strategy_text(), "");
    }

    #[test]
    fn test_string_shaped_records_are_accepted() {
        let json = r#"{
            "summary_rewrite": "Rust engineer with 8 years",
            "bullet_rewrites": ["Built a Rust cache", {"original": "a", "rewritten": "b"}, 42],
            "experience_notes": ["Emphasize Acme role"]
        }"#;
        let plan: EditPlan = serde_json::from_str(json).unwrap();
        assert_eq!(
            plan.summary_rewrite.unwrap().new_summary.as_deref(),
            Some("Rust engineer with 8 years")
        );
        assert_eq!(plan.bullet_rewrites.len(), 2);
        assert_eq!(plan.bullet_rewrites[0].rewritten.as_deref(), Some("Built a Rust cache"));
        assert_eq!(plan.bullet_rewrites[1].original.as_deref(), Some("a"));
        assert_eq!(plan.experience_notes[0].note.as_deref(), Some("Emphasize Acme role"));
    }

    #[test]
    fn test_unusable_records_are_dropped() {
        let json = r#"{"summary_rewrite": 3, "experience_notes": {"action": "trim"}, "bullet_rewrites": true}"#;
        let plan: EditPlan = serde_json::from_str(json).unwrap();
        assert!(plan.summary_rewrite.is_none());
        assert!(plan.bullet_rewrites.is_empty());
        assert_eq!(plan.experience_notes[0].action.as_deref(), Some("trim"));
    }

    #[test]
    fn test_persisted_plan_only_has_received_keys() {
        let json = r#"{"overall_strategy":"Lead with Rust.","bullet_rewrites":[{"original":"a","rewritten":"b","impact":"high"}],"section_changes":[{"section":"Skills"}]}"#;
        let plan: EditPlan = serde_json::from_str(json).unwrap();
        let persisted = serde_json::to_value(&plan).unwrap();
        assert_eq!(persisted, serde_json::from_str::<Value>(json).unwrap());
    }
}
