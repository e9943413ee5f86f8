//! Canonical pipeline stages
//!
//! The three stages that make up a data processing pipeline:
//! 1. IntakeStage - Reject empty payloads, pass everything else through
//! 2. TransformStage - Enrich sensor records, structure delimited text
//! 3. OutputStage - Render the final human-readable result

pub mod intake;
pub mod output;
pub mod transform;

// Re-export stages
pub use intake::IntakeStage;
pub use output::OutputStage;
pub use transform::TransformStage;

/// Field that identifies a sensor record
pub(crate) const SENSOR_FIELD: &str = "sensor";

/// Delimiter that marks text as field-structured
pub(crate) const FIELD_DELIMITER: char = ',';
