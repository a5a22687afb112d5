//! Application layer - Recording pipeline and port interfaces
//!
//! Contains the capture/encode/write pipeline, status dispatch and the
//! trait definitions for external system interactions.

pub mod notifier;
pub mod ports;
pub mod recorder;

// Re-export the pipeline
pub use notifier::{status_channel, ChannelListener, StatusNotifier};
pub use recorder::{Mp3Recorder, RecorderConfig, StopHandle, ZERO_READ_BACKOFF};
