//! Job Analyzer: turns a job posting into a structured [`JobProfile`].

use tracing::debug;

use crate::errors::CollaboratorError;
use crate::generation::prompts::{JOB_ANALYSIS_PROMPT_TEMPLATE, JOB_ANALYSIS_ROLE};
use crate::llm_client::prompts::{system_prompt, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, LanguageModel};
use crate::models::JobProfile;

/// Extracts a profile from already-retrieved job text. `source` is echoed
/// into `source_url` so the saved profile records where it came from.
pub async fn analyze(
    llm: &dyn LanguageModel,
    job_text: &str,
    source: &str,
) -> Result<JobProfile, CollaboratorError> {
    debug!("Sending {} chars of job content for analysis", job_text.len());

    let prompt = JOB_ANALYSIS_PROMPT_TEMPLATE.replace("{job_text}", job_text);
    let system = system_prompt(JOB_ANALYSIS_ROLE, JSON_ONLY_SYSTEM);
    let mut profile: JobProfile = call_json(llm, &prompt, &system).await?;

    profile.source_url = Some(source.to_string());
    Ok(profile)
}
