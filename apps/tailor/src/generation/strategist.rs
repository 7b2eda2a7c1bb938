//! Résumé Strategist: produces the [`EditPlan`] the rewriter applies.

use tracing::debug;

use crate::errors::CollaboratorError;
use crate::generation::prompts::{STRATEGY_PROMPT_TEMPLATE, STRATEGY_ROLE};
use crate::generation::to_pretty_json;
use crate::llm_client::prompts::{system_prompt, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, LanguageModel};
use crate::models::{CompanyBrief, EditPlan, JobProfile};

pub async fn plan(
    llm: &dyn LanguageModel,
    job: &JobProfile,
    brief: &CompanyBrief,
    resume_latex: &str,
) -> Result<EditPlan, CollaboratorError> {
    debug!(
        "Analyzing {} required skills against a {}-char résumé",
        job.required_skills.len(),
        resume_latex.len()
    );

    let prompt = STRATEGY_PROMPT_TEMPLATE
        .replace("{job_profile_json}", &to_pretty_json(job))
        .replace("{company_brief_json}", &to_pretty_json(brief))
        .replace("{resume_latex}", resume_latex);
    let system = system_prompt(STRATEGY_ROLE, JSON_ONLY_SYSTEM);
    let plan: EditPlan = call_json(llm, &prompt, &system).await?;

    debug!("Edit plan: {} planned changes", plan.planned_change_count());
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::test_llm::ScriptedLlm;
    use crate::pipeline::test_support::{sample_profile, VALID_RESUME};

    #[tokio::test]
    async fn test_plan_sends_all_three_inputs() {
        let llm = ScriptedLlm::new(vec![
            r#"{"overall_strategy": "Lead with Rust.", "skills_to_add": ["Tokio"], "section_changes": [{"x": 1}]}"#,
        ]);
        let brief = CompanyBrief {
            summary: Some("Warehouse robots.".to_string()),
            ..Default::default()
        };

        let plan = plan(&llm, &sample_profile(), &brief, VALID_RESUME)
            .await
            .unwrap();

        assert_eq!(plan.strategy_text(), "Lead with Rust.");
        assert_eq!(plan.skills_to_add.texts().collect::<Vec<_>>(), ["Tokio"]);
        assert_eq!(plan.planned_change_count(), 1);

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("\"job_title\": \"Staff Engineer\""));
        assert!(prompt.contains("Warehouse robots."));
        assert!(prompt.contains("\\begin{document}"));
    }
}
