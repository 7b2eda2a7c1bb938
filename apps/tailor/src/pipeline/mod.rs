// Tailoring pipeline: stage contract, state, runner, executor, materializer.
// Stages run strictly in sequence; only materialization touches the filesystem.

pub mod graph;
pub mod materializer;
pub mod progress;
pub mod runner;
pub mod stage;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use graph::GraphExecutor;
pub use materializer::OutputMaterializer;
pub use progress::{ConsoleProgress, ProgressReporter};
pub use runner::StageRunner;
pub use state::PipelineInputs;
