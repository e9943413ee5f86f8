//! Pipeline pattern implementation for sequential payload transformations
//!
//! This module provides the stage contract and the pipeline executor. Each
//! stage takes one payload and returns a transformed payload; the pipeline
//! threads the payloads through its stages strictly in attachment order and
//! aborts on the first failure, which is surfaced to the caller unmodified.
//!
//! # Example
//! ```
//! use nexus_pipeline::{FormatTag, Payload, Pipeline};
//! use nexus_pipeline::stages::{IntakeStage, OutputStage, TransformStage};
//! use serde_json::json;
//!
//! let pipeline = Pipeline::builder("telemetry", FormatTag::Json)
//!     .add_stage(IntakeStage::new())
//!     .add_stage(TransformStage::new())
//!     .add_stage(OutputStage::new())
//!     .build();
//!
//! let reading = Payload::record([("sensor", json!("temp")), ("value", json!(23.5))]);
//! let run = pipeline.process(reading)?;
//! assert_eq!(run.output, "Processed temperature reading: 23.5 (Normal range)");
//! # Ok::<(), nexus_pipeline::NexusError>(())
//! ```

pub mod core;
pub mod executor;
pub mod stages;

// Re-export main types
pub use core::{CancelToken, PipelineRun, PipelineStage, StageReport};
pub use executor::{Pipeline, PipelineBuilder};
