//! Status event enumeration
//!
//! The numeric codes are a wire contract with whatever front end listens
//! to the recorder, so they must never be renumbered.

use std::fmt;

use crate::domain::error::UnknownStatusCode;

/// Lifecycle and error events delivered to a status listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEvent {
    /// Device started; capture loop is about to run
    RecStarted,
    /// Session over; always the last event of a session
    RecStopped,
    /// Minimum buffer size query failed (rate/format unsupported by the device)
    ErrorGetMinBufferSize,
    /// Destination file could not be created
    ErrorCreateFile,
    /// Capture device could not be opened or started
    ErrorRecStart,
    /// Device read failed mid-session
    ErrorAudioRecord,
    /// Encoder returned an error (initialize, encode or flush)
    ErrorAudioEncode,
    /// Writing encoded bytes to the file failed
    ErrorWriteFile,
    /// Closing the output file failed
    ErrorCloseFile,
}

impl StatusEvent {
    /// All events in code order
    pub const ALL: [StatusEvent; 9] = [
        Self::RecStarted,
        Self::RecStopped,
        Self::ErrorGetMinBufferSize,
        Self::ErrorCreateFile,
        Self::ErrorRecStart,
        Self::ErrorAudioRecord,
        Self::ErrorAudioEncode,
        Self::ErrorWriteFile,
        Self::ErrorCloseFile,
    ];

    /// Integer code of this event
    pub const fn code(&self) -> i32 {
        match self {
            Self::RecStarted => 0,
            Self::RecStopped => 1,
            Self::ErrorGetMinBufferSize => 2,
            Self::ErrorCreateFile => 3,
            Self::ErrorRecStart => 4,
            Self::ErrorAudioRecord => 5,
            Self::ErrorAudioEncode => 6,
            Self::ErrorWriteFile => 7,
            Self::ErrorCloseFile => 8,
        }
    }

    /// Constant-style name, e.g. `ERROR_WRITE_FILE`
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RecStarted => "REC_STARTED",
            Self::RecStopped => "REC_STOPPED",
            Self::ErrorGetMinBufferSize => "ERROR_GET_MIN_BUFFERSIZE",
            Self::ErrorCreateFile => "ERROR_CREATE_FILE",
            Self::ErrorRecStart => "ERROR_REC_START",
            Self::ErrorAudioRecord => "ERROR_AUDIO_RECORD",
            Self::ErrorAudioEncode => "ERROR_AUDIO_ENCODE",
            Self::ErrorWriteFile => "ERROR_WRITE_FILE",
            Self::ErrorCloseFile => "ERROR_CLOSE_FILE",
        }
    }

    /// Human-readable description for status output
    pub const fn message(&self) -> &'static str {
        match self {
            Self::RecStarted => "Recording",
            Self::RecStopped => "Recording stopped",
            Self::ErrorGetMinBufferSize => {
                "Could not start recording. This device may not support the requested sample rate."
            }
            Self::ErrorCreateFile => "Could not create the output file",
            Self::ErrorRecStart => "Could not start recording",
            Self::ErrorAudioRecord => "Could not read from the microphone",
            Self::ErrorAudioEncode => "Encoding failed",
            Self::ErrorWriteFile => "Failed to write to the output file",
            Self::ErrorCloseFile => "Failed to finish writing the output file",
        }
    }

    /// Whether this event reports a failure
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::RecStarted | Self::RecStopped)
    }
}

impl TryFrom<i32> for StatusEvent {
    type Error = UnknownStatusCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(UnknownStatusCode(code))
    }
}

impl From<StatusEvent> for i32 {
    fn from(event: StatusEvent) -> Self {
        event.code()
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
