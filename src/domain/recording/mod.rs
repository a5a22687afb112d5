//! Recording domain module

mod buffers;
mod duration;
mod params;
mod sample_rate;
mod state;

pub use buffers::{SessionBuffers, ENCODE_BUFFER_HEADROOM, FRAME_BUFFER_SECONDS};
pub use duration::Duration;
pub use params::{
    EncoderParams, DEFAULT_BITRATE_KBPS, DEFAULT_QUALITY, MAX_QUALITY, SUPPORTED_BITRATES,
};
pub use sample_rate::{SampleRate, DEFAULT_SAMPLE_RATE};
pub use state::PipelineState;
