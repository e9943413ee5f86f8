use super::{FIELD_DELIMITER, SENSOR_FIELD};
use crate::error::{NexusError, NexusResult};
use crate::payload::{Payload, Record};
use crate::pipeline::PipelineStage;
use serde_json::{json, Value};

/// Stage that transforms a payload based on its shape
///
/// - A record containing a `sensor` field is marked validated: a
///   `status: "valid"` field is set, other fields are left untouched.
/// - A record without a `sensor` field is a shape violation and fails with
///   [`NexusError::InvalidFormat`].
/// - Text containing a field delimiter is split into a structured record
///   `{kind: "csv", fields: [..], count: 1}`.
/// - Any other payload passes through unchanged.
///
/// # Example
/// ```
/// use nexus_pipeline::{Payload, PipelineStage};
/// use nexus_pipeline::stages::TransformStage;
///
/// let stage = TransformStage::new();
/// let record = stage.process(Payload::text("user,action,timestamp"))?;
/// assert_eq!(
///     record.render(),
///     r#"{"kind":"csv","fields":["user","action","timestamp"],"count":1}"#
/// );
/// # Ok::<(), nexus_pipeline::NexusError>(())
/// ```
pub struct TransformStage;

impl TransformStage {
    /// Create a new transform stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for TransformStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for TransformStage {
    fn process(&self, payload: Payload) -> NexusResult<Payload> {
        match payload {
            Payload::Record(mut fields) if fields.contains_key(SENSOR_FIELD) => {
                fields.insert("status".to_string(), Value::String("valid".to_string()));
                tracing::info!("transform: enriched with metadata and validation");
                Ok(Payload::Record(fields))
            }
            Payload::Record(_) => Err(NexusError::InvalidFormat(format!(
                "record is missing the '{}' field",
                SENSOR_FIELD
            ))),
            Payload::Text(text) if text.contains(FIELD_DELIMITER) => {
                let tokens: Vec<Value> = text
                    .split(FIELD_DELIMITER)
                    .map(|token| Value::String(token.to_string()))
                    .collect();

                let mut record = Record::new();
                record.insert("kind".to_string(), json!("csv"));
                record.insert("fields".to_string(), Value::Array(tokens));
                record.insert("count".to_string(), json!(1));

                tracing::info!("transform: parsed and structured");
                Ok(Payload::Record(record))
            }
            other => {
                tracing::info!("transform: aggregated and filtered");
                Ok(other)
            }
        }
    }

    fn name(&self) -> &str {
        "Transform"
    }
}
