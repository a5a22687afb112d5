//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DurationParseError, InvalidSampleRate};
use crate::domain::recording::{
    Duration, SampleRate, DEFAULT_BITRATE_KBPS, DEFAULT_QUALITY, DEFAULT_SAMPLE_RATE,
};

/// Destination used when nothing else is configured
pub const DEFAULT_OUTPUT: &str = "recording.mp3";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub output: Option<String>,
    pub sample_rate: Option<i64>,
    pub bitrate: Option<u16>,
    pub quality: Option<u8>,
    pub max_duration: Option<String>,
    pub device: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            output: Some(DEFAULT_OUTPUT.to_string()),
            sample_rate: Some(i64::from(DEFAULT_SAMPLE_RATE)),
            bitrate: Some(DEFAULT_BITRATE_KBPS),
            quality: Some(DEFAULT_QUALITY),
            max_duration: None,
            device: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output: other.output.or(self.output),
            sample_rate: other.sample_rate.or(self.sample_rate),
            bitrate: other.bitrate.or(self.bitrate),
            quality: other.quality.or(self.quality),
            max_duration: other.max_duration.or(self.max_duration),
            device: other.device.or(self.device),
        }
    }

    /// Destination path, or `recording.mp3` if not set
    pub fn output_or_default(&self) -> PathBuf {
        PathBuf::from(self.output.as_deref().unwrap_or(DEFAULT_OUTPUT))
    }

    /// Validated sample rate. Unlike the other accessors an invalid value
    /// is an error rather than a silent fallback.
    pub fn sample_rate(&self) -> Result<SampleRate, InvalidSampleRate> {
        match self.sample_rate {
            Some(hz) => SampleRate::new(hz),
            None => Ok(SampleRate::default()),
        }
    }

    /// Bitrate in kbps, or 32 if not set
    pub fn bitrate_or_default(&self) -> u16 {
        self.bitrate.unwrap_or(DEFAULT_BITRATE_KBPS)
    }

    /// LAME quality, or 7 if not set
    pub fn quality_or_default(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_QUALITY)
    }

    /// Parsed recording limit; `None` means record until stopped
    pub fn max_duration(&self) -> Result<Option<Duration>, DurationParseError> {
        self.max_duration
            .as_deref()
            .map(str::parse)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.output, Some("recording.mp3".to_string()));
        assert_eq!(config.sample_rate, Some(8000));
        assert_eq!(config.bitrate, Some(32));
        assert_eq!(config.quality, Some(7));
        assert!(config.max_duration.is_none());
        assert!(config.device.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.output.is_none());
        assert!(config.sample_rate.is_none());
        assert!(config.bitrate.is_none());
        assert!(config.quality.is_none());
        assert!(config.max_duration.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            output: Some("base.mp3".to_string()),
            sample_rate: Some(8000),
            bitrate: Some(32),
            ..Default::default()
        };
        let other = AppConfig {
            output: Some("other.mp3".to_string()),
            sample_rate: None,
            bitrate: Some(64),
            device: Some("USB Mic".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.output, Some("other.mp3".to_string()));
        assert_eq!(merged.device.as_deref(), Some("USB Mic"));
        assert_eq!(merged.sample_rate, Some(8000));
        assert_eq!(merged.bitrate, Some(64));
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let base = AppConfig::defaults();
        assert_eq!(base.clone().merge(AppConfig::empty()), base);
    }

    #[test]
    fn sample_rate_uses_default_when_unset() {
        assert_eq!(AppConfig::empty().sample_rate().unwrap().hz(), 8000);
    }

    #[test]
    fn sample_rate_rejects_non_positive() {
        let config = AppConfig {
            sample_rate: Some(-44100),
            ..Default::default()
        };
        assert_eq!(config.sample_rate().unwrap_err().hz, -44100);
    }

    #[test]
    fn max_duration_parses_or_errors() {
        assert_eq!(AppConfig::empty().max_duration().unwrap(), None);

        let config = AppConfig {
            max_duration: Some("1m30s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration().unwrap().map(|d| d.as_secs()), Some(90));

        let config = AppConfig {
            max_duration: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(config.max_duration().is_err());
    }

    #[test]
    fn scalar_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.output_or_default(), PathBuf::from("recording.mp3"));
        assert_eq!(config.bitrate_or_default(), 32);
        assert_eq!(config.quality_or_default(), 7);
    }
}
