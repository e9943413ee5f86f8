use crate::error::{NexusError, NexusResult};
use crate::format::FormatTag;
use crate::payload::Payload;
use crate::pipeline::{CancelToken, Pipeline, PipelineRun};
use crate::route::{RoutePhase, RouteTrace};

/// Registry and router that selects a pipeline for an incoming payload
///
/// Pipelines are kept in registration order and routing is deterministic:
/// the first pipeline registered under a tag always wins a tie. A routing
/// failure is reported to the caller but leaves the registry untouched, so
/// later requests are unaffected.
///
/// # Example
/// ```
/// use nexus_pipeline::{FormatTag, NexusManager, Payload, Pipeline};
/// use nexus_pipeline::stages::{IntakeStage, OutputStage, TransformStage};
///
/// let mut manager = NexusManager::new();
/// manager.register_pipeline(
///     Pipeline::builder("activity", FormatTag::Csv)
///         .add_stage(IntakeStage::new())
///         .add_stage(TransformStage::new())
///         .add_stage(OutputStage::new())
///         .build(),
/// );
///
/// let run = manager.route(Payload::text("user,action,timestamp"), FormatTag::Csv)?;
/// assert_eq!(run.output, "User activity logged: 1 actions processed");
/// # Ok::<(), nexus_pipeline::NexusError>(())
/// ```
pub struct NexusManager {
    pipelines: Vec<Pipeline>,
}

impl NexusManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            pipelines: Vec::new(),
        }
    }

    /// Register a pipeline
    ///
    /// Registration order is routing order; a second pipeline under an
    /// already-registered tag is never reachable through `route`.
    pub fn register_pipeline(&mut self, pipeline: Pipeline) {
        tracing::info!(
            pipeline = pipeline.name(),
            tag = %pipeline.tag(),
            stages = pipeline.stage_count(),
            "registering pipeline"
        );
        self.pipelines.push(pipeline);
    }

    /// Get the number of registered pipelines
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Get the registered pipelines in registration order
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    /// Route a payload to the first pipeline registered under `tag`
    pub fn route(&self, payload: Payload, tag: FormatTag) -> NexusResult<PipelineRun> {
        self.route_internal(payload, tag, None)
    }

    /// Route a payload, checking the cancellation token before each stage
    pub fn route_with_token(
        &self,
        payload: Payload,
        tag: FormatTag,
        token: &CancelToken,
    ) -> NexusResult<PipelineRun> {
        self.route_internal(payload, tag, Some(token))
    }

    /// Route to `primary`, falling back to `fallback` when the primary
    /// attempt fails
    ///
    /// The fallback is an explicit policy: it fires both when no pipeline
    /// is registered under the primary tag and when the primary pipeline
    /// aborts mid-sequence.
    pub fn route_with_fallback(
        &self,
        payload: Payload,
        primary: FormatTag,
        fallback: FormatTag,
    ) -> NexusResult<PipelineRun> {
        match self.route(payload.clone(), primary) {
            Ok(run) => Ok(run),
            Err(error) => {
                tracing::warn!(
                    %error,
                    %primary,
                    %fallback,
                    "primary pipeline failed, switching to fallback"
                );
                self.route(payload, fallback)
            }
        }
    }

    fn route_internal(
        &self,
        payload: Payload,
        tag: FormatTag,
        token: Option<&CancelToken>,
    ) -> NexusResult<PipelineRun> {
        let mut trace = RouteTrace::new();
        trace.push(RoutePhase::Lookup);
        tracing::info!(%tag, "routing payload");

        match self.pipelines.iter().find(|p| p.tag() == tag) {
            Some(pipeline) => {
                trace.push(RoutePhase::Matched);
                pipeline.process_traced(payload, token, trace)
            }
            None => {
                trace.push(RoutePhase::Unmatched);
                trace.push(RoutePhase::Reported);
                tracing::warn!(%tag, "no pipeline registered for format");
                Err(NexusError::Routing(tag))
            }
        }
    }
}

impl Default for NexusManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineStage;
    use serde_json::json;

    // Test stage that tags a text payload with the pipeline it ran in
    struct MarkStage {
        mark: String,
    }

    impl PipelineStage for MarkStage {
        fn process(&self, _payload: Payload) -> NexusResult<Payload> {
            Ok(Payload::text(self.mark.clone()))
        }

        fn name(&self) -> &str {
            "Mark"
        }
    }

    // Test stage that always fails
    struct FailStage;

    impl PipelineStage for FailStage {
        fn process(&self, _payload: Payload) -> NexusResult<Payload> {
            Err(NexusError::InvalidFormat("bad shape".to_string()))
        }

        fn name(&self) -> &str {
            "Fail"
        }
    }

    fn marked_pipeline(name: &str, tag: FormatTag) -> Pipeline {
        Pipeline::builder(name, tag)
            .add_stage(MarkStage {
                mark: name.to_string(),
            })
            .build()
    }

    #[test]
    fn test_route_selects_matching_tag() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(marked_pipeline("json-1", FormatTag::Json));
        manager.register_pipeline(marked_pipeline("csv-1", FormatTag::Csv));

        let run = manager
            .route(Payload::token(json!("x")), FormatTag::Csv)
            .unwrap();
        assert_eq!(run.output, "csv-1");
        assert_eq!(run.pipeline, "csv-1");
    }

    #[test]
    fn test_route_first_registered_wins_on_tie() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(marked_pipeline("stream-first", FormatTag::Stream));
        manager.register_pipeline(marked_pipeline("stream-second", FormatTag::Stream));

        // Deterministic across repeated calls
        for _ in 0..3 {
            let run = manager
                .route(Payload::token(json!("x")), FormatTag::Stream)
                .unwrap();
            assert_eq!(run.pipeline, "stream-first");
        }
    }

    #[test]
    fn test_route_unregistered_tag_reports_error() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(marked_pipeline("json-1", FormatTag::Json));

        let result = manager.route(Payload::token(json!("x")), FormatTag::Stream);
        assert!(matches!(result, Err(NexusError::Routing(FormatTag::Stream))));
    }

    #[test]
    fn test_routing_failure_does_not_affect_registry() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(marked_pipeline("json-1", FormatTag::Json));

        let _ = manager.route(Payload::token(json!("x")), FormatTag::Csv);

        assert_eq!(manager.pipeline_count(), 1);
        let run = manager
            .route(Payload::token(json!("x")), FormatTag::Json)
            .unwrap();
        assert_eq!(run.pipeline, "json-1");
    }

    #[test]
    fn test_stage_failure_surfaces_unmodified() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(
            Pipeline::builder("failing", FormatTag::Json)
                .add_stage(FailStage)
                .build(),
        );

        let result = manager.route(Payload::token(json!("x")), FormatTag::Json);
        match result {
            Err(NexusError::InvalidFormat(msg)) => assert_eq!(msg, "bad shape"),
            other => panic!("expected InvalidFormat, got {:?}", other.map(|r| r.output)),
        }
    }

    #[test]
    fn test_fallback_fires_on_stage_failure() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(
            Pipeline::builder("primary", FormatTag::Json)
                .add_stage(FailStage)
                .build(),
        );
        manager.register_pipeline(marked_pipeline("backup", FormatTag::Stream));

        let run = manager
            .route_with_fallback(Payload::token(json!("x")), FormatTag::Json, FormatTag::Stream)
            .unwrap();
        assert_eq!(run.pipeline, "backup");
    }

    #[test]
    fn test_fallback_fires_on_routing_failure() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(marked_pipeline("backup", FormatTag::Stream));

        let run = manager
            .route_with_fallback(Payload::token(json!("x")), FormatTag::Csv, FormatTag::Stream)
            .unwrap();
        assert_eq!(run.pipeline, "backup");
    }

    #[test]
    fn test_fallback_error_when_both_fail() {
        let manager = NexusManager::new();
        let result = manager.route_with_fallback(
            Payload::token(json!("x")),
            FormatTag::Json,
            FormatTag::Csv,
        );
        assert!(matches!(result, Err(NexusError::Routing(FormatTag::Csv))));
    }

    #[test]
    fn test_route_with_token_cancels() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(marked_pipeline("json-1", FormatTag::Json));

        let token = CancelToken::new();
        token.cancel();

        let result = manager.route_with_token(Payload::token(json!("x")), FormatTag::Json, &token);
        assert!(matches!(result, Err(NexusError::Cancelled { .. })));
    }

    #[test]
    fn test_successful_route_trace() {
        let mut manager = NexusManager::new();
        manager.register_pipeline(marked_pipeline("json-1", FormatTag::Json));

        let run = manager
            .route(Payload::token(json!("x")), FormatTag::Json)
            .unwrap();
        assert_eq!(
            run.trace.phases(),
            &[
                RoutePhase::Idle,
                RoutePhase::Lookup,
                RoutePhase::Matched,
                RoutePhase::StageExecuting(0),
                RoutePhase::Completed,
            ]
        );
    }
}
