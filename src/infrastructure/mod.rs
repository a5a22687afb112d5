//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: cpal microphone
//! capture, the LAME encoder, local output files and the XDG config file.

pub mod capture;
pub mod config;
pub mod encoding;
pub mod output;

// Re-export adapters
pub use capture::{CpalAudioSource, CpalCaptureStream};
pub use config::XdgConfigStore;
pub use encoding::LameEncoder;
pub use output::{FileSink, LocalFile};
