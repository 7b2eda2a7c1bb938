// Collaborators: the external work each pipeline stage delegates.
// One trait method per stage. Production wiring goes through the shared LLM
// client; tests substitute scripted implementations.

pub mod company_research;
pub mod cover_letter;
pub mod job_analyzer;
pub mod latex_rewriter;
pub mod prompts;
pub mod strategist;

#[cfg(test)]
pub(crate) mod test_llm;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::CollaboratorError;
use crate::llm_client::LanguageModel;
use crate::models::{CompanyBrief, EditPlan, JobProfile};
use crate::sources::{PageFetcher, WebSearch};

#[async_trait]
pub trait Collaborators: Send + Sync {
    /// Retrieves the posting at `source` (file path or URL) and extracts a profile.
    async fn analyze_job(&self, source: &str) -> Result<JobProfile, CollaboratorError>;

    /// Researches the employer. Must return a degraded brief, not an error,
    /// when `company_name` is missing.
    async fn research_company(
        &self,
        company_name: Option<&str>,
        website: Option<&str>,
    ) -> Result<CompanyBrief, CollaboratorError>;

    async fn plan_strategy(
        &self,
        job: &JobProfile,
        brief: &CompanyBrief,
        resume_latex: &str,
    ) -> Result<EditPlan, CollaboratorError>;

    /// Never fails because the model's LaTeX is unusable; see
    /// [`latex_rewriter::finalize_rewrite`].
    async fn rewrite_resume(
        &self,
        resume_latex: &str,
        plan: &EditPlan,
        job: &JobProfile,
    ) -> Result<String, CollaboratorError>;

    async fn write_cover_letter(
        &self,
        job: &JobProfile,
        brief: &CompanyBrief,
        resume_latex: &str,
    ) -> Result<String, CollaboratorError>;
}

/// LLM-backed collaborators. All five share one language model handle.
pub struct LlmCollaborators {
    llm: Arc<dyn LanguageModel>,
    fetcher: PageFetcher,
    search: Option<Arc<dyn WebSearch>>,
}

impl LlmCollaborators {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        fetcher: PageFetcher,
        search: Option<Arc<dyn WebSearch>>,
    ) -> Self {
        Self {
            llm,
            fetcher,
            search,
        }
    }
}

#[async_trait]
impl Collaborators for LlmCollaborators {
    async fn analyze_job(&self, source: &str) -> Result<JobProfile, CollaboratorError> {
        let job_text = self.fetcher.job_text(source).await?;
        job_analyzer::analyze(self.llm.as_ref(), &job_text, source).await
    }

    async fn research_company(
        &self,
        company_name: Option<&str>,
        website: Option<&str>,
    ) -> Result<CompanyBrief, CollaboratorError> {
        company_research::research(
            self.llm.as_ref(),
            self.search.as_deref(),
            company_name,
            website,
        )
        .await
    }

    async fn plan_strategy(
        &self,
        job: &JobProfile,
        brief: &CompanyBrief,
        resume_latex: &str,
    ) -> Result<EditPlan, CollaboratorError> {
        strategist::plan(self.llm.as_ref(), job, brief, resume_latex).await
    }

    async fn rewrite_resume(
        &self,
        resume_latex: &str,
        plan: &EditPlan,
        job: &JobProfile,
    ) -> Result<String, CollaboratorError> {
        latex_rewriter::rewrite(self.llm.as_ref(), resume_latex, plan, job).await
    }

    async fn write_cover_letter(
        &self,
        job: &JobProfile,
        brief: &CompanyBrief,
        resume_latex: &str,
    ) -> Result<String, CollaboratorError> {
        cover_letter::write(self.llm.as_ref(), job, brief, resume_latex).await
    }
}

/// Pretty JSON for embedding a record in a prompt.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
