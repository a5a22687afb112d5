//! Pipeline state machine

use std::fmt;

/// Lifecycle of a recorder instance.
///
/// ```text
///   Idle -> Starting      start()
///   Starting -> Recording worker started the device
///   Starting -> Stopping  stop() before the device started
///   Recording -> Stopping stop()
///   Stopping -> Idle      worker finished cleanup
/// ```
///
/// Fatal errors skip straight from `Starting`/`Recording` to the worker's
/// cleanup, which always ends in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PipelineState {
    #[default]
    Idle = 0,
    Starting = 1,
    Recording = 2,
    Stopping = 3,
}

impl PipelineState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
        }
    }

    /// Encode for storage in an `AtomicU8`
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode from an `AtomicU8`; unknown values read as `Idle`
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Starting,
            2 => Self::Recording,
            3 => Self::Stopping,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
