//! Graph executor: the enumerated state machine driving a run.
//!
//! ```text
//! JobAnalysis → CompanyResearch → StrategyPlanning → DocumentRewrite
//!     → (CoverLetter | ∅) → Materialization → Done
//! ```
//!
//! [`next`] is the only place routing is decided. The single branch is after
//! `DocumentRewrite`, keyed on the cover-letter flag.

use tracing::{debug, info};

use crate::errors::PipelineError;

use super::materializer::{MaterializationReport, OutputMaterializer};
use super::runner::StageRunner;
use super::stage::Stage;
use super::state::{PipelineInputs, PipelineState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Stage(Stage),
    Materialization,
    Done,
}

pub const ENTRY: Node = Node::Stage(Stage::JobAnalysis);

/// Pure transition function.
pub fn next(node: Node, state: &PipelineState) -> Node {
    match node {
        Node::Stage(Stage::JobAnalysis) => Node::Stage(Stage::CompanyResearch),
        Node::Stage(Stage::CompanyResearch) => Node::Stage(Stage::StrategyPlanning),
        Node::Stage(Stage::StrategyPlanning) => Node::Stage(Stage::DocumentRewrite),
        Node::Stage(Stage::DocumentRewrite) => {
            if state.inputs().generate_cover_letter {
                Node::Stage(Stage::CoverLetter)
            } else {
                Node::Materialization
            }
        }
        Node::Stage(Stage::CoverLetter) => Node::Materialization,
        Node::Materialization | Node::Done => Node::Done,
    }
}

/// Terminal result of a successful run.
#[derive(Debug)]
pub struct RunOutcome {
    pub state: PipelineState,
    pub report: MaterializationReport,
}

pub struct GraphExecutor {
    runner: StageRunner,
    materializer: OutputMaterializer,
}

impl GraphExecutor {
    pub fn new(runner: StageRunner, materializer: OutputMaterializer) -> Self {
        Self {
            runner,
            materializer,
        }
    }

    /// Drives a fresh state from [`ENTRY`] to `Done`. The first error stops the
    /// machine; nothing after the failing node runs.
    pub async fn run(&self, inputs: PipelineInputs) -> Result<RunOutcome, PipelineError> {
        let mut state = PipelineState::new(inputs);
        let mut node = ENTRY;

        while let Node::Stage(stage) = node {
            debug!(?node, populated = ?state.populated_fields(), "entering node");
            state = self.runner.run(stage, state).await?;
            node = next(node, &state);
        }

        // Every stage path ends here; this is the only node that writes files.
        debug_assert_eq!(node, Node::Materialization);
        let report = self.materializer.materialize(&state).await?;
        for warning in &report.warnings {
            state.record_error(warning.clone());
        }
        node = next(node, &state);
        debug_assert_eq!(node, Node::Done);

        info!(steps = ?state.completed_steps(), "pipeline complete");
        Ok(RunOutcome { state, report })
    }
}
