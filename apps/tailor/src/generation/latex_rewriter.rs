//! LaTeX Rewriter: applies an [`EditPlan`] to the résumé source.
//!
//! The model's output is only accepted when it still looks like a complete
//! document. Otherwise the original résumé is returned with the plan's
//! strategy prepended as a LaTeX comment, so the pipeline always has a
//! compilable deliverable.

use tracing::{debug, warn};

use crate::errors::CollaboratorError;
use crate::generation::prompts::{REWRITE_PROMPT_TEMPLATE, REWRITE_ROLE};
use crate::generation::to_pretty_json;
use crate::llm_client::prompts::{system_prompt, LATEX_ONLY_SYSTEM};
use crate::llm_client::{strip_fences, LanguageModel};
use crate::models::{EditPlan, JobProfile};

const MAX_REQUIRED_SKILLS: usize = 10;
const MAX_ATS_KEYWORDS: usize = 15;
/// Largest tolerated difference between `{` and `}` counts.
const BRACE_TOLERANCE: usize = 10;

pub async fn rewrite(
    llm: &dyn LanguageModel,
    resume_latex: &str,
    plan: &EditPlan,
    job: &JobProfile,
) -> Result<String, CollaboratorError> {
    debug!(
        "Applying {} bullet rewrites, injecting {:?}",
        plan.bullet_rewrites.len(),
        plan.keywords_to_inject.texts().take(5).collect::<Vec<_>>()
    );

    let prompt = REWRITE_PROMPT_TEMPLATE
        .replace("{job_title}", job.title_or(""))
        .replace("{required_skills}", &job.required_skills.join(MAX_REQUIRED_SKILLS))
        .replace("{ats_keywords}", &job.ats_keywords.join(MAX_ATS_KEYWORDS))
        .replace("{edit_plan_json}", &to_pretty_json(plan))
        .replace("{resume_latex}", resume_latex);
    let system = system_prompt(REWRITE_ROLE, LATEX_ONLY_SYSTEM);

    let raw = llm.complete(&prompt, &system).await?;
    Ok(finalize_rewrite(&raw, resume_latex, plan))
}

/// Strips code fences from `raw` and validates it, falling back to the
/// annotated original when validation fails.
pub fn finalize_rewrite(raw: &str, original: &str, plan: &EditPlan) -> String {
    let candidate = strip_fences(raw, &["latex", "tex"]);
    if looks_like_document(candidate) {
        return candidate.to_string();
    }

    warn!("LaTeX validation failed, returning original résumé with the edit plan as a comment");
    let strategy = serde_json::to_string(plan.strategy_text()).unwrap_or_default();
    format!("% EDIT PLAN:\n% {strategy}\n\n{original}")
}

fn looks_like_document(latex: &str) -> bool {
    let has_begin = latex.contains(r"\begin{document}");
    let has_end = latex.contains(r"\end{document}");
    let open = latex.matches('{').count();
    let close = latex.matches('}').count();
    let balanced = open.abs_diff(close) < BRACE_TOLERANCE;

    debug!("LaTeX validation: begin_doc={has_begin}, end_doc={has_end}, balanced_braces={balanced}");
    has_begin && has_end && balanced
}
