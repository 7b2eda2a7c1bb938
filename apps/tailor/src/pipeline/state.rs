use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::errors::PipelineError;
use crate::models::{CompanyBrief, EditPlan, JobProfile};

/// Run inputs. Fixed at construction; nothing in the pipeline can change them.
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    /// Job posting URL or path to a local text file.
    pub job_source: String,
    pub resume_latex: String,
    pub output_dir: PathBuf,
    pub generate_cover_letter: bool,
    /// Failure notices carry the full error structure instead of its message.
    pub verbose: bool,
}

/// A stage-owned output slot in [`PipelineState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateField {
    JobProfile,
    CompanyBrief,
    EditPlan,
    TailoredResume,
    CoverLetter,
}

impl StateField {
    pub fn as_str(self) -> &'static str {
        match self {
            StateField::JobProfile => "job_profile",
            StateField::CompanyBrief => "company_brief",
            StateField::EditPlan => "edit_plan",
            StateField::TailoredResume => "tailored_resume_latex",
            StateField::CoverLetter => "cover_letter_latex",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record threaded through every stage.
///
/// Output fields are private and set-once: the `with_*` builders consume the
/// state and fail if the slot is already filled, so a later stage can only
/// ever add to what an earlier one produced.
#[derive(Debug, Clone)]
pub struct PipelineState {
    inputs: PipelineInputs,

    job_profile: Option<JobProfile>,
    company_brief: Option<CompanyBrief>,
    edit_plan: Option<EditPlan>,
    tailored_resume_latex: Option<String>,
    cover_letter_latex: Option<String>,

    completed_steps: Vec<String>,
    /// Non-fatal problems noted during the run. Nothing reads it for recovery.
    errors: Vec<String>,
}

impl PipelineState {
    pub fn new(inputs: PipelineInputs) -> Self {
        Self {
            inputs,
            job_profile: None,
            company_brief: None,
            edit_plan: None,
            tailored_resume_latex: None,
            cover_letter_latex: None,
            completed_steps: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn inputs(&self) -> &PipelineInputs {
        &self.inputs
    }

    pub fn job_profile(&self) -> Option<&JobProfile> {
        self.job_profile.as_ref()
    }

    pub fn company_brief(&self) -> Option<&CompanyBrief> {
        self.company_brief.as_ref()
    }

    pub fn edit_plan(&self) -> Option<&EditPlan> {
        self.edit_plan.as_ref()
    }

    pub fn tailored_resume_latex(&self) -> Option<&str> {
        self.tailored_resume_latex.as_deref()
    }

    pub fn cover_letter_latex(&self) -> Option<&str> {
        self.cover_letter_latex.as_deref()
    }

    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn with_job_profile(mut self, profile: JobProfile) -> Result<Self, PipelineError> {
        set_once(&mut self.job_profile, profile, StateField::JobProfile)?;
        Ok(self)
    }

    pub fn with_company_brief(mut self, brief: CompanyBrief) -> Result<Self, PipelineError> {
        set_once(&mut self.company_brief, brief, StateField::CompanyBrief)?;
        Ok(self)
    }

    pub fn with_edit_plan(mut self, plan: EditPlan) -> Result<Self, PipelineError> {
        set_once(&mut self.edit_plan, plan, StateField::EditPlan)?;
        Ok(self)
    }

    pub fn with_tailored_resume(mut self, latex: String) -> Result<Self, PipelineError> {
        set_once(
            &mut self.tailored_resume_latex,
            latex,
            StateField::TailoredResume,
        )?;
        Ok(self)
    }

    pub fn with_cover_letter(mut self, latex: String) -> Result<Self, PipelineError> {
        set_once(&mut self.cover_letter_latex, latex, StateField::CoverLetter)?;
        Ok(self)
    }

    pub(crate) fn record_completed(&mut self, step: &str) {
        self.completed_steps.push(step.to_string());
    }

    pub(crate) fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Whether `field` holds a usable value. Text counts only when non-blank.
    pub fn is_populated(&self, field: StateField) -> bool {
        match field {
            StateField::JobProfile => self.job_profile.is_some(),
            StateField::CompanyBrief => self.company_brief.is_some(),
            StateField::EditPlan => self.edit_plan.is_some(),
            StateField::TailoredResume => non_blank(&self.tailored_resume_latex),
            StateField::CoverLetter => non_blank(&self.cover_letter_latex),
        }
    }

    pub fn populated_fields(&self) -> BTreeSet<StateField> {
        [
            StateField::JobProfile,
            StateField::CompanyBrief,
            StateField::EditPlan,
            StateField::TailoredResume,
            StateField::CoverLetter,
        ]
        .into_iter()
        .filter(|f| self.is_populated(*f))
        .collect()
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: StateField) -> Result<(), PipelineError> {
    if slot.is_some() {
        return Err(PipelineError::AlreadyPopulated(field));
    }
    *slot = Some(value);
    Ok(())
}

fn non_blank(text: &Option<String>) -> bool {
    text.as_deref().is_some_and(|t| !t.trim().is_empty())
}
