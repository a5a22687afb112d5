//! Sample rate value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidSampleRate;

/// Default capture rate. 8 kHz is the one rate every microphone path
/// (including emulators) is known to support.
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;

/// Capture sample rate in Hz.
/// Always positive; validated on creation before any I/O happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleRate(u32);

impl SampleRate {
    /// Validate a raw rate in Hz
    pub fn new(hz: i64) -> Result<Self, InvalidSampleRate> {
        match u32::try_from(hz) {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(InvalidSampleRate { hz }),
        }
    }

    /// Rate in Hz
    pub const fn hz(&self) -> u32 {
        self.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self(DEFAULT_SAMPLE_RATE)
    }
}

impl TryFrom<i64> for SampleRate {
    type Error = InvalidSampleRate;

    fn try_from(hz: i64) -> Result<Self, Self::Error> {
        Self::new(hz)
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> Self {
        rate.0
    }
}

impl FromStr for SampleRate {
    type Err = InvalidSampleRate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_suffix("Hz")
            .or_else(|| trimmed.strip_suffix("hz"))
            .unwrap_or(trimmed)
            .trim();
        // Unparseable input is reported as rate 0 so the message stays uniform
        let hz = trimmed.parse::<i64>().unwrap_or(0);
        Self::new(hz)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_rates() {
        assert_eq!(SampleRate::new(8000).unwrap().hz(), 8000);
        assert_eq!(SampleRate::new(44100).unwrap().hz(), 44100);
        assert_eq!(SampleRate::new(1).unwrap().hz(), 1);
    }

    #[test]
    fn rejects_zero_and_negative() {
        for hz in [0, -1, -8000, i64::MIN] {
            let err = SampleRate::new(hz).unwrap_err();
            assert_eq!(err.hz, hz);
        }
    }

    #[test]
    fn rejects_values_beyond_u32() {
        assert!(SampleRate::new(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn parses_with_optional_unit() {
        assert_eq!("16000".parse::<SampleRate>().unwrap().hz(), 16000);
        assert_eq!(" 22050Hz ".parse::<SampleRate>().unwrap().hz(), 22050);
        assert!("-5".parse::<SampleRate>().is_err());
        assert!("fast".parse::<SampleRate>().is_err());
    }

    #[test]
    fn default_is_8khz() {
        assert_eq!(SampleRate::default().hz(), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn display_includes_unit() {
        assert_eq!(SampleRate::new(48000).unwrap().to_string(), "48000 Hz");
    }
}
