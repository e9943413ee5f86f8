//! Multi-format data processing pipelines with format-based routing
//!
//! A payload (a record, raw text, or an opaque token) flows through a named
//! pipeline: an ordered, fixed sequence of stages, each of which validates
//! its input and either returns a transformed payload or signals a typed
//! failure that aborts the remaining sequence. A manager keeps pipelines in
//! registration order and routes each incoming payload to the first
//! pipeline whose format tag matches the request.
//!
//! # Example
//! ```
//! use nexus_pipeline::{FormatTag, NexusManager, Payload, Pipeline};
//! use nexus_pipeline::stages::{IntakeStage, OutputStage, TransformStage};
//! use serde_json::json;
//!
//! let mut manager = NexusManager::new();
//! manager.register_pipeline(
//!     Pipeline::builder("telemetry", FormatTag::Json)
//!         .add_stage(IntakeStage::new())
//!         .add_stage(TransformStage::new())
//!         .add_stage(OutputStage::new())
//!         .build(),
//! );
//!
//! let reading = Payload::record([
//!     ("sensor", json!("temp")),
//!     ("value", json!(23.5)),
//!     ("unit", json!("C")),
//! ]);
//! let run = manager.route(reading, FormatTag::Json)?;
//! assert_eq!(run.output, "Processed temperature reading: 23.5 (Normal range)");
//! # Ok::<(), nexus_pipeline::NexusError>(())
//! ```

pub mod error;
pub mod format;
pub mod manager;
pub mod payload;
pub mod pipeline;
pub mod route;

// Re-export main types
pub use error::{NexusError, NexusResult};
pub use format::FormatTag;
pub use manager::NexusManager;
pub use payload::{Payload, Record};
pub use pipeline::stages;
pub use pipeline::{CancelToken, Pipeline, PipelineBuilder, PipelineRun, PipelineStage, StageReport};
pub use route::{RoutePhase, RouteTrace};
