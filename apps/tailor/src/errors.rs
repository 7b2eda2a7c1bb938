use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::pipeline::stage::Stage;
use crate::pipeline::state::StateField;

/// Pipeline-level error type. Every variant is fatal: the executor stops at the
/// first one and `main` turns it into a diagnostic and a non-zero exit code.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot run {stage} without {missing}")]
    Precondition { stage: Stage, missing: StateField },

    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: CollaboratorError,
    },

    #[error("{0} was already populated and cannot be overwritten")]
    AlreadyPopulated(StateField),

    #[error("no tailored résumé to save")]
    MissingResume,

    #[error("failed to write {}: {source}", path.display())]
    Materialize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    /// The stage the error is attributed to, if it happened inside one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Precondition { stage, .. } | PipelineError::Stage { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }
}

/// Failure of an external collaborator invoked by a stage.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to fetch job page: {0}")]
    Fetch(#[from] FetchError),

    #[error("web search failed: {0}")]
    Search(#[from] SearchError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("page at {0} contained no readable text")]
    Empty(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// PDF compilation failure. Never fatal; the `.tex` source is the deliverable.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("compile service returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("compile service returned {content_type:?} instead of a PDF")]
    NotPdf { content_type: String },

    #[error("compilation failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<CompileError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_message_names_the_stage() {
        let err = PipelineError::Stage {
            stage: Stage::StrategyPlanning,
            source: CollaboratorError::Llm(LlmError::EmptyContent),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Résumé Strategist failed"), "{msg}");
        assert_eq!(err.stage(), Some(Stage::StrategyPlanning));
    }

    #[test]
    fn test_materialization_errors_have_no_stage() {
        assert_eq!(PipelineError::MissingResume.stage(), None);
    }

    #[test]
    fn test_exhausted_carries_last_error() {
        let err = CompileError::Exhausted {
            attempts: 2,
            last: Box::new(CompileError::Rejected {
                status: 500,
                body: "! Undefined control sequence".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("after 2 attempts"));
        assert!(msg.contains("Undefined control sequence"));
    }
}
