//! MP3 encoder port interface

use thiserror::Error;

use crate::domain::recording::EncoderParams;

/// Encoder failures. The numbered variants mirror LAME's negative return codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("Output buffer too small")]
    BufferTooSmall,

    #[error("Encoder could not allocate memory")]
    OutOfMemory,

    #[error("Encoder used before initialization")]
    NotInitialized,

    #[error("Psychoacoustic model failure")]
    Psychoacoustic,

    #[error("Encoder failed with code {0}")]
    Code(i32),

    #[error("Encoder initialization failed: {0}")]
    InitFailed(String),
}

impl EncoderError {
    /// Map a negative LAME return code
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::BufferTooSmall,
            -2 => Self::OutOfMemory,
            -3 => Self::NotInitialized,
            -4 => Self::Psychoacoustic,
            other => Self::Code(other),
        }
    }

    /// Equivalent LAME return code, if this error has one
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::BufferTooSmall => Some(-1),
            Self::OutOfMemory => Some(-2),
            Self::NotInitialized => Some(-3),
            Self::Psychoacoustic => Some(-4),
            Self::Code(code) => Some(*code),
            Self::InitFailed(_) => None,
        }
    }
}

/// Port for a stateful MP3 encoder with a four-call lifecycle.
///
/// Per session: `initialize` once, any number of `encode`, one `flush`,
/// then `close` exactly once even if anything before it failed.
pub trait Mp3Encoder: Send + 'static {
    /// Set up encoder state. Re-initializing discards any previous state.
    fn initialize(&mut self, params: EncoderParams) -> Result<(), EncoderError>;

    /// Encode one block of PCM, `left.len()` samples per channel.
    ///
    /// Writes compressed bytes into `output` and returns how many were
    /// written. Zero is valid: the encoder may be holding the samples back.
    fn encode(&mut self, left: &[i16], right: &[i16], output: &mut [u8])
        -> Result<usize, EncoderError>;

    /// Drain buffered state at end of stream. `output` must hold at least 7200 bytes.
    fn flush(&mut self, output: &mut [u8]) -> Result<usize, EncoderError>;

    /// Release encoder state. A no-op when not initialized.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lame_codes_map_to_variants() {
        assert_eq!(EncoderError::from_code(-1), EncoderError::BufferTooSmall);
        assert_eq!(EncoderError::from_code(-2), EncoderError::OutOfMemory);
        assert_eq!(EncoderError::from_code(-3), EncoderError::NotInitialized);
        assert_eq!(EncoderError::from_code(-4), EncoderError::Psychoacoustic);
        assert_eq!(EncoderError::from_code(-10), EncoderError::Code(-10));
    }

    #[test]
    fn code_round_trips() {
        for code in [-1, -2, -3, -4, -6] {
            assert_eq!(EncoderError::from_code(code).code(), Some(code));
        }
        assert_eq!(EncoderError::InitFailed("x".into()).code(), None);
    }
}
