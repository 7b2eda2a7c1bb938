use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use tracing::{error, info, warn};

/// Events emitted while the pipeline runs. Payloads are digests, never the
/// full stage output.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    StageStarted {
        /// `"1/5"` for numbered stages, `"✓"` for materialization.
        position: String,
        title: String,
        intent: String,
    },
    StageCompleted {
        label: String,
        digest: String,
    },
    StageFailed {
        position: String,
        title: String,
        error: String,
    },
    ArtifactSaved {
        path: PathBuf,
    },
    Warning {
        message: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Prints human-readable progress to stdout and mirrors it to tracing.
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::StageStarted {
                position,
                title,
                intent,
            } => {
                info!(stage = %title, position = %position, "stage started");
                println!("\n[{position}] {title}");
                println!("    {intent}");
            }
            ProgressEvent::StageCompleted { label, digest } => {
                info!(result = %digest, "{label}");
                println!("{label}: {digest}");
            }
            ProgressEvent::StageFailed {
                position,
                title,
                error: message,
            } => {
                error!(stage = %title, position = %position, "stage failed: {message}");
                eprintln!("\nCRITICAL ERROR: [{position}] {title} failed: {message}");
            }
            ProgressEvent::ArtifactSaved { path } => {
                info!(path = %path.display(), "artifact saved");
            }
            ProgressEvent::Warning { message } => {
                warn!("{message}");
                println!("Warning: {message}");
            }
        }
    }
}

/// Keeps every event in memory for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

#[cfg(test)]
impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
