//! Output materialization: the only place a run writes to disk.
//!
//! Files are named `{company}_{role}_{YYYYmmdd_HHMMSS}_{kind}.{ext}`. If any
//! name of the chosen set already exists the whole set moves to a numbered
//! base (`_2`, `_3`, …). Every file is opened with exclusive create before
//! anything is written, and a set that loses a race to another writer is
//! discarded and claimed again under the next base, so an earlier run's output
//! is never overwritten.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::errors::PipelineError;
use crate::models::JobProfile;
use crate::render::LatexCompiler;
use crate::sanitize::filename_component;

use super::progress::{ProgressEvent, ProgressReporter};
use super::state::PipelineState;

const MAX_BASE_NAME_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Resume,
    CoverLetter,
    JobProfile,
    CompanyBrief,
    EditPlan,
}

impl ArtifactKind {
    fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Resume => "resume",
            ArtifactKind::CoverLetter => "cover_letter",
            ArtifactKind::JobProfile => "job_profile",
            ArtifactKind::CompanyBrief => "company_brief",
            ArtifactKind::EditPlan => "edit_plan",
        }
    }

    fn extension(self) -> &'static str {
        if self.is_document() {
            "tex"
        } else {
            "json"
        }
    }

    /// Documents get a PDF compiled next to them.
    fn is_document(self) -> bool {
        matches!(self, ArtifactKind::Resume | ArtifactKind::CoverLetter)
    }

    fn source_name(self, base: &str) -> String {
        format!("{base}_{}.{}", self.suffix(), self.extension())
    }

    fn file_names(self, base: &str) -> Vec<String> {
        let mut names = vec![self.source_name(base)];
        if self.is_document() {
            names.push(format!("{base}_{}.pdf", self.suffix()));
        }
        names
    }
}

/// What a successful materialization wrote.
#[derive(Debug, Clone, Default)]
pub struct MaterializationReport {
    pub base_name: String,
    pub saved: Vec<PathBuf>,
    /// Non-fatal problems, e.g. a PDF that failed to compile.
    pub warnings: Vec<String>,
}

pub struct OutputMaterializer {
    compiler: Option<Arc<dyn LatexCompiler>>,
    progress: Arc<dyn ProgressReporter>,
}

impl OutputMaterializer {
    /// `compiler` is optional; without one only source artifacts are written.
    pub fn new(
        compiler: Option<Arc<dyn LatexCompiler>>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self { compiler, progress }
    }

    pub async fn materialize(
        &self,
        state: &PipelineState,
    ) -> Result<MaterializationReport, PipelineError> {
        let resume = state
            .tailored_resume_latex()
            .filter(|t| !t.trim().is_empty())
            .ok_or(PipelineError::MissingResume)?;

        self.progress.report(ProgressEvent::StageStarted {
            position: "✓".to_string(),
            title: "Saving Outputs".to_string(),
            intent: "Writing files to disk...".to_string(),
        });

        let mut artifacts: Vec<(ArtifactKind, Vec<u8>)> =
            vec![(ArtifactKind::Resume, resume.as_bytes().to_vec())];
        if let Some(letter) = state.cover_letter_latex().filter(|t| !t.trim().is_empty()) {
            artifacts.push((ArtifactKind::CoverLetter, letter.as_bytes().to_vec()));
        }
        if let Some(profile) = state.job_profile() {
            artifacts.push((ArtifactKind::JobProfile, to_json(profile, "job profile")?));
        }
        if let Some(brief) = state.company_brief() {
            artifacts.push((ArtifactKind::CompanyBrief, to_json(brief, "company brief")?));
        }
        if let Some(plan) = state.edit_plan() {
            artifacts.push((ArtifactKind::EditPlan, to_json(plan, "edit plan")?));
        }

        let output_dir = &state.inputs().output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| PipelineError::Materialize {
                path: output_dir.clone(),
                source,
            })?;

        let stem = base_stem(state.job_profile(), Local::now().naive_local());
        let kinds: Vec<ArtifactKind> = artifacts.iter().map(|(k, _)| *k).collect();
        let (base_name, files) = claim_base_name(output_dir, &stem, &kinds).await?;

        let mut report = MaterializationReport {
            base_name,
            ..Default::default()
        };

        for ((kind, contents), (path, file)) in artifacts.into_iter().zip(files) {
            write_contents(file, &path, &contents).await?;
            self.saved(&mut report, path.clone());

            if !kind.is_document() {
                continue;
            }
            let Some(compiler) = &self.compiler else {
                continue;
            };
            match compiler.compile(&path).await {
                Ok(pdf) => self.saved(&mut report, pdf),
                Err(e) => {
                    let message = format!(
                        "PDF compilation failed for {} (the .tex is still saved): {e}",
                        kind.suffix()
                    );
                    warn!("{message}");
                    self.progress.report(ProgressEvent::Warning {
                        message: message.clone(),
                    });
                    report.warnings.push(message);
                }
            }
        }

        info!(
            base_name = %report.base_name,
            files = report.saved.len(),
            warnings = report.warnings.len(),
            "outputs saved"
        );
        Ok(report)
    }

    fn saved(&self, report: &mut MaterializationReport, path: PathBuf) {
        self.progress
            .report(ProgressEvent::ArtifactSaved { path: path.clone() });
        report.saved.push(path);
    }
}

/// `{company}_{role}_{YYYYmmdd_HHMMSS}` before collision handling.
fn base_stem(profile: Option<&JobProfile>, now: NaiveDateTime) -> String {
    let company = filename_component(
        profile.and_then(|p| p.company_name.as_deref()).unwrap_or(""),
        "company",
    );
    let role = filename_component(
        profile.and_then(|p| p.job_title.as_deref()).unwrap_or(""),
        "role",
    );
    format!("{company}_{role}_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Claims the first free base name by exclusively creating every source file
/// of the set. Returns the base and the created files in `kinds` order.
async fn claim_base_name(
    dir: &Path,
    stem: &str,
    kinds: &[ArtifactKind],
) -> Result<(String, Vec<(PathBuf, File)>), PipelineError> {
    for n in 1..=MAX_BASE_NAME_ATTEMPTS {
        let candidate = if n == 1 {
            stem.to_string()
        } else {
            format!("{stem}_{n}")
        };
        if is_taken(dir, &candidate, kinds) {
            continue;
        }
        match create_set(dir, &candidate, kinds).await? {
            Some(files) => return Ok((candidate, files)),
            None => debug!("Output name {candidate} was claimed by another writer, trying the next"),
        }
    }
    Err(PipelineError::Materialize {
        path: dir.join(stem),
        source: std::io::Error::new(
            ErrorKind::AlreadyExists,
            "no free output name left for this run",
        ),
    })
}

/// True when any file of the set exists, PDFs included.
fn is_taken(dir: &Path, base: &str, kinds: &[ArtifactKind]) -> bool {
    kinds
        .iter()
        .flat_map(|k| k.file_names(base))
        .any(|name| dir.join(name).exists())
}

/// Creates the whole set or nothing. `None` means some name already existed;
/// the files this call did create are removed again.
async fn create_set(
    dir: &Path,
    base: &str,
    kinds: &[ArtifactKind],
) -> Result<Option<Vec<(PathBuf, File)>>, PipelineError> {
    let mut files = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let path = dir.join(kind.source_name(base));
        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;
        match opened {
            Ok(file) => files.push((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                discard(files).await;
                return Ok(None);
            }
            Err(source) => {
                discard(files).await;
                return Err(PipelineError::Materialize { path, source });
            }
        }
    }
    Ok(Some(files))
}

async fn discard(files: Vec<(PathBuf, File)>) {
    for (path, file) in files {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Could not remove {}: {e}", path.display());
        }
    }
}

fn to_json<T: serde::Serialize>(
    value: &T,
    artifact: &'static str,
) -> Result<Vec<u8>, PipelineError> {
    serde_json::to_vec_pretty(value).map_err(|source| PipelineError::Serialize { artifact, source })
}

async fn write_contents(
    mut file: File,
    path: &Path,
    contents: &[u8],
) -> Result<(), PipelineError> {
    let to_err = |source| PipelineError::Materialize {
        path: path.to_path_buf(),
        source,
    };
    file.write_all(contents).await.map_err(to_err)?;
    file.flush().await.map_err(to_err)
}
