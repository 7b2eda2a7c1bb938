//! Stage contract: what each pipeline step needs, owns and produces.

use std::fmt;

use crate::errors::{CollaboratorError, PipelineError};
use crate::generation::Collaborators;
use crate::models::digest;

use super::state::{PipelineState, StateField};

/// Number of numbered stages shown in progress output.
pub const STAGE_COUNT: usize = 5;

/// Longest free-text excerpt a result notice may carry.
const DIGEST_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    JobAnalysis,
    CompanyResearch,
    StrategyPlanning,
    DocumentRewrite,
    CoverLetter,
}

impl Stage {
    #[cfg(test)]
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::JobAnalysis,
        Stage::CompanyResearch,
        Stage::StrategyPlanning,
        Stage::DocumentRewrite,
        Stage::CoverLetter,
    ];

    /// 1-based position in the pipeline.
    pub fn ordinal(self) -> usize {
        match self {
            Stage::JobAnalysis => 1,
            Stage::CompanyResearch => 2,
            Stage::StrategyPlanning => 3,
            Stage::DocumentRewrite => 4,
            Stage::CoverLetter => 5,
        }
    }

    /// Name recorded in `completed_steps`.
    pub fn name(self) -> &'static str {
        match self {
            Stage::JobAnalysis => "job_analyzer",
            Stage::CompanyResearch => "company_researcher",
            Stage::StrategyPlanning => "resume_strategist",
            Stage::DocumentRewrite => "latex_refactorer",
            Stage::CoverLetter => "cover_letter_writer",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::JobAnalysis => "Job Analyzer",
            Stage::CompanyResearch => "Company Researcher",
            Stage::StrategyPlanning => "Résumé Strategist",
            Stage::DocumentRewrite => "LaTeX Refactorer",
            Stage::CoverLetter => "Cover Letter Writer",
        }
    }

    pub fn intent(self, state: &PipelineState) -> String {
        match self {
            Stage::JobAnalysis => "Fetching and analyzing job posting...".to_string(),
            Stage::CompanyResearch => format!(
                "Researching {}...",
                state
                    .job_profile()
                    .map_or("company", |p| p.company_or("company"))
            ),
            Stage::StrategyPlanning => "Planning tailoring strategy...".to_string(),
            Stage::DocumentRewrite => "Rewriting résumé LaTeX...".to_string(),
            Stage::CoverLetter => "Drafting tailored cover letter...".to_string(),
        }
    }

    /// The output slot this stage fills.
    pub fn owns(self) -> StateField {
        match self {
            Stage::JobAnalysis => StateField::JobProfile,
            Stage::CompanyResearch => StateField::CompanyBrief,
            Stage::StrategyPlanning => StateField::EditPlan,
            Stage::DocumentRewrite => StateField::TailoredResume,
            Stage::CoverLetter => StateField::CoverLetter,
        }
    }

    /// Upstream outputs that must be non-empty before the stage may run.
    pub fn requires(self) -> &'static [StateField] {
        match self {
            Stage::JobAnalysis => &[],
            Stage::CompanyResearch => &[StateField::JobProfile],
            Stage::StrategyPlanning => &[StateField::JobProfile, StateField::CompanyBrief],
            Stage::DocumentRewrite => &[StateField::JobProfile, StateField::EditPlan],
            Stage::CoverLetter => &[StateField::JobProfile, StateField::CompanyBrief],
        }
    }

    /// Fails if an upstream output is missing or if this stage's own slot is
    /// already filled.
    pub fn check_preconditions(self, state: &PipelineState) -> Result<(), PipelineError> {
        if let Some(missing) = self.requires().iter().find(|f| !state.is_populated(**f)) {
            return Err(PipelineError::Precondition {
                stage: self,
                missing: *missing,
            });
        }
        if state.is_populated(self.owns()) {
            return Err(PipelineError::AlreadyPopulated(self.owns()));
        }
        Ok(())
    }

    /// Runs the stage against `state` and returns a new state with the owned
    /// field filled. The input is never modified.
    ///
    /// Preconditions are checked before any collaborator is touched.
    pub async fn execute(
        self,
        state: &PipelineState,
        collaborators: &dyn Collaborators,
    ) -> Result<PipelineState, PipelineError> {
        self.check_preconditions(state)?;
        let fail = |source: CollaboratorError| PipelineError::Stage { stage: self, source };

        match self {
            Stage::JobAnalysis => {
                let profile = collaborators
                    .analyze_job(&state.inputs().job_source)
                    .await
                    .map_err(fail)?;
                state.clone().with_job_profile(profile)
            }
            Stage::CompanyResearch => {
                let profile = required(state.job_profile(), self, StateField::JobProfile)?;
                let brief = collaborators
                    .research_company(profile.company(), profile.website())
                    .await
                    .map_err(fail)?;
                state.clone().with_company_brief(brief)
            }
            Stage::StrategyPlanning => {
                let profile = required(state.job_profile(), self, StateField::JobProfile)?;
                let brief = required(state.company_brief(), self, StateField::CompanyBrief)?;
                let plan = collaborators
                    .plan_strategy(profile, brief, &state.inputs().resume_latex)
                    .await
                    .map_err(fail)?;
                state.clone().with_edit_plan(plan)
            }
            Stage::DocumentRewrite => {
                let profile = required(state.job_profile(), self, StateField::JobProfile)?;
                let plan = required(state.edit_plan(), self, StateField::EditPlan)?;
                let latex = collaborators
                    .rewrite_resume(&state.inputs().resume_latex, plan, profile)
                    .await
                    .map_err(fail)?;
                state.clone().with_tailored_resume(latex)
            }
            Stage::CoverLetter => {
                let profile = required(state.job_profile(), self, StateField::JobProfile)?;
                let brief = required(state.company_brief(), self, StateField::CompanyBrief)?;
                let latex = collaborators
                    .write_cover_letter(profile, brief, &state.inputs().resume_latex)
                    .await
                    .map_err(fail)?;
                state.clone().with_cover_letter(latex)
            }
        }
    }

    /// One-line summary of what the stage produced. Never the full payload.
    pub fn digest(self, state: &PipelineState) -> (&'static str, String) {
        match self {
            Stage::JobAnalysis => {
                let text = state.job_profile().map_or_else(String::new, |p| {
                    format!("{} @ {}", p.title_or("Unknown"), p.company_or("Unknown"))
                });
                ("Job analyzed", digest(&text, DIGEST_CHARS))
            }
            Stage::CompanyResearch => {
                let summary = state.company_brief().map_or("", |b| b.summary_text());
                ("Company researched", digest(summary, DIGEST_CHARS))
            }
            Stage::StrategyPlanning => {
                let n = state.edit_plan().map_or(0, |p| p.planned_change_count());
                ("Strategy ready", format!("{n} planned changes"))
            }
            Stage::DocumentRewrite => {
                let len = state.tailored_resume_latex().map_or(0, |t| t.chars().count());
                ("Résumé rewritten", format!("{len} characters of LaTeX"))
            }
            Stage::CoverLetter => {
                let len = state.cover_letter_latex().map_or(0, |t| t.chars().count());
                ("Cover letter ready", format!("{len} characters"))
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn required<T>(value: Option<T>, stage: Stage, field: StateField) -> Result<T, PipelineError> {
    value.ok_or(PipelineError::Precondition {
        stage,
        missing: field,
    })
}
