use crate::error::NexusResult;
use crate::format::FormatTag;
use crate::payload::Payload;
use crate::route::RouteTrace;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// A single stage in a pipeline
///
/// Each stage is a deterministic transform over one payload: it validates
/// its input and either returns a transformed payload or signals a typed
/// failure, which aborts the remaining sequence. Stages carry no
/// cross-invocation state, so one stage instance can be attached to several
/// pipelines and invoked reentrantly.
///
/// # Example
/// ```
/// use nexus_pipeline::{NexusResult, Payload, PipelineStage};
///
/// struct UppercaseStage;
///
/// impl PipelineStage for UppercaseStage {
///     fn process(&self, payload: Payload) -> NexusResult<Payload> {
///         match payload {
///             Payload::Text(text) => Ok(Payload::Text(text.to_uppercase())),
///             other => Ok(other),
///         }
///     }
///
///     fn name(&self) -> &str {
///         "Uppercase"
///     }
/// }
/// ```
pub trait PipelineStage: Send + Sync {
    /// Transform the payload
    ///
    /// The returned payload becomes the exact input of the next stage. An
    /// error stops the pipeline immediately.
    fn process(&self, payload: Payload) -> NexusResult<Payload>;

    /// Get stage name for logging and reports
    fn name(&self) -> &str;

    /// Called before `process()` - useful for input validation
    fn validate(&self, _payload: &Payload) -> NexusResult<()> {
        Ok(())
    }
}

/// Timing report for one executed stage
#[derive(Debug, Clone)]
pub struct StageReport {
    /// Stage name
    pub stage: String,

    /// Measured duration of execution
    pub duration: Duration,
}

impl StageReport {
    pub fn new(stage: impl Into<String>, duration: Duration) -> Self {
        Self {
            stage: stage.into(),
            duration,
        }
    }
}

/// Report of a completed pipeline run
///
/// Only successful runs produce a report; a stage failure aborts the run
/// and surfaces the error itself, with no partial result retained.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Pipeline name
    pub pipeline: String,

    /// Format tag the pipeline is registered under
    pub tag: FormatTag,

    /// Rendered final output
    pub output: String,

    /// Timing reports from each stage, in execution order
    pub stage_reports: Vec<StageReport>,

    /// Measured total duration
    pub total_duration: Duration,

    /// When the run completed
    pub completed_at: DateTime<Utc>,

    /// Phases the request passed through
    pub trace: RouteTrace,
}

impl PipelineRun {
    /// Get the number of stages that executed
    pub fn executed_stages(&self) -> usize {
        self.stage_reports.len()
    }

    /// Get the summed stage execution time
    pub fn stage_time(&self) -> Duration {
        self.stage_reports.iter().map(|r| r.duration).sum()
    }
}

/// Cooperative cancellation flag shared between a caller and a running
/// pipeline
///
/// The executor checks the token before each stage; once cancelled, the
/// remaining sequence is aborted the same way a stage failure aborts it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
