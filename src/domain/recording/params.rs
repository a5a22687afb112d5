//! Encoder initialization parameters

use super::SampleRate;

/// Bitrate the recorder asks LAME for unless configured otherwise
pub const DEFAULT_BITRATE_KBPS: u16 = 32;

/// LAME quality 7: "ok quality, really fast"
pub const DEFAULT_QUALITY: u8 = 7;

/// Worst (fastest) LAME quality level; 0 is best
pub const MAX_QUALITY: u8 = 9;

/// Constant bitrates the LAME binding accepts, in kbps
pub const SUPPORTED_BITRATES: &[u16] = &[
    8, 16, 24, 32, 40, 48, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// Arguments to the encoder's `initialize` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderParams {
    pub input_sample_rate: SampleRate,
    pub channels: u8,
    pub output_sample_rate: SampleRate,
    pub bitrate_kbps: u16,
    /// 0 = best (very slow) .. 9 = worst
    pub quality: u8,
}

impl EncoderParams {
    /// Mono capture encoded at its own rate
    pub fn mono(rate: SampleRate, bitrate_kbps: u16, quality: u8) -> Self {
        Self {
            input_sample_rate: rate,
            channels: 1,
            output_sample_rate: rate,
            bitrate_kbps,
            quality: quality.min(MAX_QUALITY),
        }
    }

    /// Check a bitrate against [`SUPPORTED_BITRATES`]
    pub fn is_supported_bitrate(kbps: u16) -> bool {
        SUPPORTED_BITRATES.contains(&kbps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_uses_one_channel_and_same_rate() {
        let rate = SampleRate::new(8000).unwrap();
        let params = EncoderParams::mono(rate, DEFAULT_BITRATE_KBPS, DEFAULT_QUALITY);
        assert_eq!(params.channels, 1);
        assert_eq!(params.input_sample_rate, rate);
        assert_eq!(params.output_sample_rate, rate);
        assert_eq!(params.bitrate_kbps, 32);
        assert_eq!(params.quality, 7);
    }

    #[test]
    fn quality_is_clamped() {
        let rate = SampleRate::new(8000).unwrap();
        assert_eq!(EncoderParams::mono(rate, 32, 42).quality, MAX_QUALITY);
    }

    #[test]
    fn bitrate_support() {
        assert!(EncoderParams::is_supported_bitrate(32));
        assert!(EncoderParams::is_supported_bitrate(320));
        assert!(!EncoderParams::is_supported_bitrate(33));
        assert!(!EncoderParams::is_supported_bitrate(0));
    }
}
