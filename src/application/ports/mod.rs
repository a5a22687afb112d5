//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the recording pipeline
//! and the infrastructure adapters.

pub mod audio_source;
pub mod config;
pub mod encoder;
pub mod output_sink;
pub mod status;

// Re-export common types
pub use audio_source::{AudioSource, CaptureError, CaptureStream};
pub use config::ConfigStore;
pub use encoder::{EncoderError, Mp3Encoder};
pub use output_sink::{OutputFile, OutputSink, SinkError};
pub use status::StatusListener;
