use std::sync::Arc;

use tracing::{info_span, Instrument};

use crate::errors::PipelineError;
use crate::generation::Collaborators;

use super::progress::{ProgressEvent, ProgressReporter};
use super::stage::{Stage, STAGE_COUNT};
use super::state::PipelineState;

/// Wraps stage execution with progress notices and completion bookkeeping.
///
/// Every error is fatal here. The runner reports it and hands it back; it
/// never retries and never keeps a partial result.
pub struct StageRunner {
    collaborators: Arc<dyn Collaborators>,
    progress: Arc<dyn ProgressReporter>,
}

impl StageRunner {
    pub fn new(collaborators: Arc<dyn Collaborators>, progress: Arc<dyn ProgressReporter>) -> Self {
        Self {
            collaborators,
            progress,
        }
    }

    pub async fn run(
        &self,
        stage: Stage,
        state: PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        let position = format!("{}/{}", stage.ordinal(), STAGE_COUNT);

        self.progress.report(ProgressEvent::StageStarted {
            position: position.clone(),
            title: stage.title().to_string(),
            intent: stage.intent(&state),
        });

        let result = stage
            .execute(&state, self.collaborators.as_ref())
            .instrument(info_span!("stage", name = stage.name(), position = %position))
            .await;

        match result {
            Ok(mut next) => {
                next.record_completed(stage.name());
                let (label, digest) = stage.digest(&next);
                self.progress.report(ProgressEvent::StageCompleted {
                    label: label.to_string(),
                    digest,
                });
                Ok(next)
            }
            Err(e) => {
                let error = if state.inputs().verbose {
                    format!("{e:?}")
                } else {
                    e.to_string()
                };
                self.progress.report(ProgressEvent::StageFailed {
                    position,
                    title: stage.title().to_string(),
                    error,
                });
                Err(e)
            }
        }
    }
}
