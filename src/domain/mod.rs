//! Domain layer - Core recording model
//!
//! Contains value objects, the pipeline state machine, status events
//! and domain errors. This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod status;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recording::{Duration, EncoderParams, PipelineState, SampleRate, SessionBuffers};
pub use status::StatusEvent;
