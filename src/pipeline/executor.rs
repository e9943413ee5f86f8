use super::core::{CancelToken, PipelineRun, PipelineStage, StageReport};
use crate::error::{NexusError, NexusResult};
use crate::format::FormatTag;
use crate::payload::Payload;
use crate::route::{RoutePhase, RouteTrace};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// An ordered, fixed sequence of stages under one format tag
///
/// Stages run strictly in attachment order, each stage's output threading
/// into the next. The first stage to fail aborts the remaining sequence and
/// its error is surfaced to the caller unmodified. The stage sequence and
/// the tag are fixed at `build()`; the tag is a routing key only and never
/// alters which stages run.
///
/// # Example
/// ```
/// use nexus_pipeline::{FormatTag, Payload, Pipeline};
/// use nexus_pipeline::stages::{IntakeStage, OutputStage, TransformStage};
///
/// let pipeline = Pipeline::builder("telemetry", FormatTag::Json)
///     .add_stage(IntakeStage::new())
///     .add_stage(TransformStage::new())
///     .add_stage(OutputStage::new())
///     .build();
///
/// let run = pipeline.process(Payload::text("user,action,timestamp"))?;
/// assert_eq!(run.output, "User activity logged: 1 actions processed");
/// # Ok::<(), nexus_pipeline::NexusError>(())
/// ```
pub struct Pipeline {
    name: String,
    tag: FormatTag,
    stages: Vec<Arc<dyn PipelineStage>>,
    stage_deadline: Option<Duration>,
    runs: AtomicU64,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder(name: impl Into<String>, tag: FormatTag) -> PipelineBuilder {
        PipelineBuilder::new(name, tag)
    }

    /// Get the pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the format tag this pipeline is registered under
    pub fn tag(&self) -> FormatTag {
        self.tag
    }

    /// Get the number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Get how many times this pipeline has been invoked
    pub fn run_count(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Execute the pipeline on one payload
    pub fn process(&self, payload: Payload) -> NexusResult<PipelineRun> {
        self.process_traced(payload, None, RouteTrace::matched())
    }

    /// Execute the pipeline, checking the token before each stage
    pub fn process_with_token(
        &self,
        payload: Payload,
        token: &CancelToken,
    ) -> NexusResult<PipelineRun> {
        self.process_traced(payload, Some(token), RouteTrace::matched())
    }

    /// Internal execution method that records the route trace
    pub(crate) fn process_traced(
        &self,
        payload: Payload,
        token: Option<&CancelToken>,
        mut trace: RouteTrace,
    ) -> NexusResult<PipelineRun> {
        let run_id = Uuid::new_v4();
        self.runs.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            pipeline = %self.name,
            tag = %self.tag,
            stages = self.stages.len(),
            %run_id,
            "starting pipeline"
        );

        let pipeline_start = Instant::now();
        let mut stage_reports = Vec::with_capacity(self.stages.len());
        let mut current = payload;

        for (index, stage) in self.stages.iter().enumerate() {
            let stage_name = stage.name();

            if let Some(token) = token {
                if token.is_cancelled() {
                    trace.push(RoutePhase::Aborted);
                    tracing::warn!(
                        pipeline = %self.name,
                        stage = stage_name,
                        %run_id,
                        "cancelled before stage"
                    );
                    return Err(NexusError::Cancelled {
                        pipeline: self.name.clone(),
                    });
                }
            }

            trace.push(RoutePhase::StageExecuting(index));
            tracing::info!(
                pipeline = %self.name,
                stage = stage_name,
                position = index + 1,
                of = self.stages.len(),
                %run_id,
                "executing stage"
            );

            let stage_start = Instant::now();

            if let Err(e) = stage.validate(&current) {
                trace.push(RoutePhase::Aborted);
                tracing::error!(
                    pipeline = %self.name,
                    stage = stage_name,
                    error = %e,
                    %run_id,
                    "stage validation failed"
                );
                return Err(e);
            }

            match stage.process(current) {
                Ok(next) => {
                    let duration = stage_start.elapsed();

                    if let Some(deadline) = self.stage_deadline {
                        if duration > deadline {
                            trace.push(RoutePhase::Aborted);
                            tracing::error!(
                                pipeline = %self.name,
                                stage = stage_name,
                                ?duration,
                                ?deadline,
                                %run_id,
                                "stage exceeded deadline"
                            );
                            return Err(NexusError::DeadlineExceeded {
                                stage: stage_name.to_string(),
                                deadline,
                            });
                        }
                    }

                    stage_reports.push(StageReport::new(stage_name, duration));
                    current = next;
                }
                Err(e) => {
                    trace.push(RoutePhase::Aborted);
                    tracing::error!(
                        pipeline = %self.name,
                        stage = stage_name,
                        error = %e,
                        %run_id,
                        "stage failed"
                    );
                    return Err(e);
                }
            }
        }

        trace.push(RoutePhase::Completed);
        let total_duration = pipeline_start.elapsed();
        let output = current.render();

        tracing::info!(
            pipeline = %self.name,
            output = %output,
            ?total_duration,
            %run_id,
            "pipeline completed"
        );

        Ok(PipelineRun {
            run_id,
            pipeline: self.name.clone(),
            tag: self.tag,
            output,
            stage_reports,
            total_duration,
            completed_at: chrono::Utc::now(),
            trace,
        })
    }
}

/// Builder for constructing pipelines
///
/// The builder is the only way to attach stages; once `build()` returns,
/// the stage sequence is immutable.
pub struct PipelineBuilder {
    name: String,
    tag: FormatTag,
    stages: Vec<Arc<dyn PipelineStage>>,
    stage_deadline: Option<Duration>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new(name: impl Into<String>, tag: FormatTag) -> Self {
        Self {
            name: name.into(),
            tag,
            stages: Vec::new(),
            stage_deadline: None,
        }
    }

    /// Append a stage to the sequence
    pub fn add_stage<S: PipelineStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Append a stage instance shared with other pipelines
    pub fn add_shared_stage(mut self, stage: Arc<dyn PipelineStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Abort a run when any single stage takes longer than this
    ///
    /// The check is cooperative: a synchronous stage cannot be preempted,
    /// so the overrun is detected when the stage returns and the remaining
    /// sequence is aborted.
    pub fn stage_deadline(mut self, deadline: Duration) -> Self {
        self.stage_deadline = Some(deadline);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            name: self.name,
            tag: self.tag,
            stages: self.stages,
            stage_deadline: self.stage_deadline,
            runs: AtomicU64::new(0),
        }
    }
}
