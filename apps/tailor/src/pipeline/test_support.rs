//! Scripted collaborators and a fake compiler for pipeline tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{CollaboratorError, CompileError};
use crate::generation::latex_rewriter::finalize_rewrite;
use crate::generation::Collaborators;
use crate::llm_client::LlmError;
use crate::models::{CompanyBrief, EditPlan, JobProfile};
use crate::render::LatexCompiler;

use super::stage::Stage;
use super::state::PipelineInputs;

pub const VALID_RESUME: &str = r"\documentclass{article}
\begin{document}
\section{Experience}
\begin{itemize}
  \item Worked on caching
\end{itemize}
\end{document}
";

pub fn inputs(generate_cover_letter: bool) -> PipelineInputs {
    inputs_in(Path::new("output"), generate_cover_letter)
}

pub fn inputs_in(output_dir: &Path, generate_cover_letter: bool) -> PipelineInputs {
    PipelineInputs {
        job_source: "https://jobs.example.com/staff-engineer".to_string(),
        resume_latex: VALID_RESUME.to_string(),
        output_dir: output_dir.to_path_buf(),
        generate_cover_letter,
        verbose: false,
    }
}

pub fn sample_profile() -> JobProfile {
    JobProfile {
        job_title: Some("Staff Engineer".to_string()),
        company_name: Some("Acme Robotics".to_string()),
        required_skills: ["Rust", "Kubernetes"].into_iter().collect(),
        summary: Some("Lead the robotics control plane.".to_string()),
        ..Default::default()
    }
}

pub fn sample_plan() -> EditPlan {
    serde_json::from_str(
        r#"{
            "overall_strategy": "Lead with control-plane work.",
            "bullet_rewrites": [
                {"original": "Worked on caching", "rewritten": "Built a Rust cache", "reason": "quantify"}
            ]
        }"#,
    )
    .unwrap()
}

/// Collaborators that return canned outputs and record every call.
#[derive(Default)]
pub struct ScriptedCollaborators {
    calls: Mutex<Vec<Stage>>,
    fail_at: Option<Stage>,
    invalid_rewrite: bool,
}

impl ScriptedCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(mut self, stage: Stage) -> Self {
        self.fail_at = Some(stage);
        self
    }

    /// Makes the rewriter produce LaTeX with no `\end{document}`.
    pub fn with_rewrite_fallback(mut self) -> Self {
        self.invalid_rewrite = true;
        self
    }

    pub fn calls(&self) -> Vec<Stage> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, stage: Stage) -> Result<(), CollaboratorError> {
        self.calls.lock().unwrap().push(stage);
        if self.fail_at == Some(stage) {
            return Err(CollaboratorError::Llm(LlmError::Api {
                status: 503,
                message: format!("scripted failure in {}", stage.name()),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl Collaborators for ScriptedCollaborators {
    async fn analyze_job(&self, source: &str) -> Result<JobProfile, CollaboratorError> {
        self.enter(Stage::JobAnalysis)?;
        Ok(JobProfile {
            source_url: Some(source.to_string()),
            ..sample_profile()
        })
    }

    async fn research_company(
        &self,
        company_name: Option<&str>,
        _website: Option<&str>,
    ) -> Result<CompanyBrief, CollaboratorError> {
        self.enter(Stage::CompanyResearch)?;
        Ok(CompanyBrief {
            company_name: company_name.map(str::to_string),
            summary: Some("Acme builds warehouse robots.".to_string()),
            tone: Some("startup-casual".to_string()),
            ..Default::default()
        })
    }

    async fn plan_strategy(
        &self,
        _job: &JobProfile,
        _brief: &CompanyBrief,
        _resume_latex: &str,
    ) -> Result<EditPlan, CollaboratorError> {
        self.enter(Stage::StrategyPlanning)?;
        Ok(sample_plan())
    }

    async fn rewrite_resume(
        &self,
        resume_latex: &str,
        plan: &EditPlan,
        _job: &JobProfile,
    ) -> Result<String, CollaboratorError> {
        self.enter(Stage::DocumentRewrite)?;
        let raw = if self.invalid_rewrite {
            "\\documentclass{article}\n\\begin{document}\nTruncated output".to_string()
        } else {
            resume_latex.replace("Worked on caching", "Built a Rust cache")
        };
        Ok(finalize_rewrite(&raw, resume_latex, plan))
    }

    async fn write_cover_letter(
        &self,
        job: &JobProfile,
        _brief: &CompanyBrief,
        _resume_latex: &str,
    ) -> Result<String, CollaboratorError> {
        self.enter(Stage::CoverLetter)?;
        Ok(format!(
            "\\documentclass{{letter}}\n\\begin{{document}}\nDear {} team,\n\\end{{document}}\n",
            job.company_or("Hiring")
        ))
    }
}

/// Compiler stand-in: either writes a stub PDF next to the source or fails.
pub struct FakeCompiler {
    fail: bool,
}

impl FakeCompiler {
    pub fn ok() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl LatexCompiler for FakeCompiler {
    async fn compile(&self, tex_path: &Path) -> Result<PathBuf, CompileError> {
        if self.fail {
            return Err(CompileError::Exhausted {
                attempts: 2,
                last: Box::new(CompileError::Rejected {
                    status: 400,
                    body: "! LaTeX Error: File `moderncv.cls' not found.".to_string(),
                }),
            });
        }
        let pdf = tex_path.with_extension("pdf");
        std::fs::write(&pdf, b"%PDF-1.5\n").map_err(|source| CompileError::Write {
            path: pdf.clone(),
            source,
        })?;
        Ok(pdf)
    }
}
