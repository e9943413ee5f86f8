use crate::error::{NexusError, NexusResult};
use crate::payload::Payload;
use crate::pipeline::PipelineStage;

/// Stage that admits a payload into the pipeline
///
/// Traces the raw payload it received, rejects empty payloads with
/// [`NexusError::EmptyPayload`] and returns everything else unchanged.
///
/// # Example
/// ```
/// use nexus_pipeline::{Payload, PipelineStage};
/// use nexus_pipeline::stages::IntakeStage;
///
/// let stage = IntakeStage::new();
/// let payload = stage.process(Payload::text("Real-time sensor stream"))?;
/// assert_eq!(payload, Payload::text("Real-time sensor stream"));
/// # Ok::<(), nexus_pipeline::NexusError>(())
/// ```
pub struct IntakeStage;

impl IntakeStage {
    /// Create a new intake stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for IntakeStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for IntakeStage {
    fn process(&self, payload: Payload) -> NexusResult<Payload> {
        tracing::info!(payload = %payload, "intake: received raw payload");

        if payload.is_empty() {
            return Err(NexusError::EmptyPayload);
        }

        Ok(payload)
    }

    fn name(&self) -> &str {
        "Intake"
    }

    fn validate(&self, payload: &Payload) -> NexusResult<()> {
        if payload.is_empty() {
            return Err(NexusError::EmptyPayload);
        }
        Ok(())
    }
}
