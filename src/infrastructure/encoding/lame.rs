//! LAME-backed implementation of the encoder port
//!
//! Requires `libmp3lame` (linked through `mp3lame-encoder`).

use std::mem::MaybeUninit;

use mp3lame_encoder::{Bitrate, Builder, DualPcm, EncodeError, Encoder, FlushNoGap, Quality};
use tracing::debug;

use crate::application::ports::{EncoderError, Mp3Encoder};
use crate::domain::recording::EncoderParams;

/// Stateful LAME encoder. Holds no native state until `initialize`.
#[derive(Default)]
pub struct LameEncoder {
    inner: Option<Encoder>,
}

impl LameEncoder {
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn bitrate(kbps: u16) -> Result<Bitrate, EncoderError> {
        Ok(match kbps {
            8 => Bitrate::Kbps8,
            16 => Bitrate::Kbps16,
            24 => Bitrate::Kbps24,
            32 => Bitrate::Kbps32,
            40 => Bitrate::Kbps40,
            48 => Bitrate::Kbps48,
            64 => Bitrate::Kbps64,
            80 => Bitrate::Kbps80,
            96 => Bitrate::Kbps96,
            112 => Bitrate::Kbps112,
            128 => Bitrate::Kbps128,
            160 => Bitrate::Kbps160,
            192 => Bitrate::Kbps192,
            224 => Bitrate::Kbps224,
            256 => Bitrate::Kbps256,
            320 => Bitrate::Kbps320,
            other => {
                return Err(EncoderError::InitFailed(format!(
                    "unsupported bitrate {other} kbps"
                )))
            }
        })
    }

    fn quality(level: u8) -> Quality {
        match level {
            0 => Quality::Best,
            1 => Quality::SecondBest,
            2 => Quality::NearBest,
            3 => Quality::VeryNice,
            4 => Quality::Nice,
            5 => Quality::Good,
            6 => Quality::Decent,
            7 => Quality::Ok,
            8 => Quality::SecondWorst,
            _ => Quality::Worst,
        }
    }
}

/// Translate the crate's error into LAME's numbered failure kinds
fn encode_error(e: EncodeError) -> EncoderError {
    match e {
        EncodeError::BufferTooSmall => EncoderError::BufferTooSmall,
        EncodeError::NoMem => EncoderError::OutOfMemory,
        EncodeError::InvalidState => EncoderError::NotInitialized,
        EncodeError::PsychoAcoustic => EncoderError::Psychoacoustic,
        EncodeError::Other(code) => EncoderError::from_code(code as i32),
    }
}

/// View an initialized byte buffer as the uninit slice LAME writes into.
fn as_uninit(buf: &mut [u8]) -> &mut [MaybeUninit<u8>] {
    // SAFETY: MaybeUninit<u8> has the layout of u8, and the encoder only
    // ever stores initialized bytes, so `buf` stays fully initialized.
    unsafe { &mut *(buf as *mut [u8] as *mut [MaybeUninit<u8>]) }
}

impl Mp3Encoder for LameEncoder {
    fn initialize(&mut self, params: EncoderParams) -> Result<(), EncoderError> {
        self.close();

        let init = |step: &str, e: &dyn std::fmt::Debug| {
            EncoderError::InitFailed(format!("{step}: {e:?}"))
        };

        let mut builder = Builder::new().ok_or(EncoderError::OutOfMemory)?;
        builder
            .set_num_channels(params.channels)
            .map_err(|e| init("set_num_channels", &e))?;
        builder
            .set_sample_rate(params.input_sample_rate.hz())
            .map_err(|e| init("set_sample_rate", &e))?;
        builder
            .set_brate(Self::bitrate(params.bitrate_kbps)?)
            .map_err(|e| init("set_brate", &e))?;
        builder
            .set_quality(Self::quality(params.quality))
            .map_err(|e| init("set_quality", &e))?;

        // The builder has no setter for the output rate; without one LAME
        // derives it from the bitrate and may resample.
        let out_rate = params.output_sample_rate.hz() as std::os::raw::c_int;
        // SAFETY: the pointer belongs to `builder`, which is alive and not
        // yet initialized; this only stores a field LAME reads in `build`.
        let status = unsafe { mp3lame_sys::lame_set_out_samplerate(builder.as_ptr(), out_rate) };
        if status != 0 {
            return Err(init("set_out_samplerate", &status));
        }

        let encoder = builder.build().map_err(|e| init("build", &e))?;

        debug!(
            rate = params.input_sample_rate.hz(),
            out_rate = params.output_sample_rate.hz(),
            channels = params.channels,
            kbps = params.bitrate_kbps,
            quality = params.quality,
            "LAME initialized"
        );
        self.inner = Some(encoder);
        Ok(())
    }

    fn encode(
        &mut self,
        left: &[i16],
        right: &[i16],
        output: &mut [u8],
    ) -> Result<usize, EncoderError> {
        let encoder = self.inner.as_mut().ok_or(EncoderError::NotInitialized)?;
        encoder
            .encode(DualPcm { left, right }, as_uninit(output))
            .map_err(encode_error)
    }

    fn flush(&mut self, output: &mut [u8]) -> Result<usize, EncoderError> {
        let encoder = self.inner.as_mut().ok_or(EncoderError::NotInitialized)?;
        encoder
            .flush::<FlushNoGap>(as_uninit(output))
            .map_err(encode_error)
    }

    fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("LAME closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::{SampleRate, SessionBuffers};

    fn params(hz: i64) -> EncoderParams {
        EncoderParams::mono(SampleRate::new(hz).unwrap(), 32, 7)
    }

    /// One second of silence through a fresh encoder, flushed
    fn encode_second(params: EncoderParams) -> Vec<u8> {
        let rate = params.input_sample_rate;
        let frame_len = SessionBuffers::frame_len(rate);
        let mut out = vec![0u8; SessionBuffers::encode_len(frame_len)];
        let silence = vec![0i16; rate.hz() as usize];

        let mut encoder = LameEncoder::new();
        encoder.initialize(params).unwrap();

        let mut stream = Vec::new();
        let n = encoder.encode(&silence, &silence, &mut out).unwrap();
        stream.extend_from_slice(&out[..n]);
        let n = encoder.flush(&mut out).unwrap();
        stream.extend_from_slice(&out[..n]);
        encoder.close();
        stream
    }

    /// Sample rate encoded in the first MPEG audio frame header
    fn first_frame_rate(stream: &[u8]) -> Option<u32> {
        let start = stream
            .windows(2)
            .position(|w| w[0] == 0xFF && w[1] & 0xE0 == 0xE0)?;
        let header = stream.get(start..start + 3)?;
        let table: [u32; 3] = match (header[1] >> 3) & 0b11 {
            0b11 => [44100, 48000, 32000],
            0b10 => [22050, 24000, 16000],
            0b00 => [11025, 12000, 8000],
            _ => return None,
        };
        table.get(((header[2] >> 2) & 0b11) as usize).copied()
    }

    #[test]
    fn encode_before_initialize_fails() {
        let mut encoder = LameEncoder::new();
        let mut out = vec![0u8; 8192];
        assert_eq!(
            encoder.encode(&[0; 16], &[0; 16], &mut out),
            Err(EncoderError::NotInitialized)
        );
        assert_eq!(encoder.flush(&mut out), Err(EncoderError::NotInitialized));
    }

    #[test]
    fn close_is_idempotent() {
        let mut encoder = LameEncoder::new();
        encoder.close();
        encoder.initialize(params(8000)).unwrap();
        encoder.close();
        encoder.close();
        let mut out = vec![0u8; 8192];
        assert_eq!(encoder.flush(&mut out), Err(EncoderError::NotInitialized));
    }

    #[test]
    fn unsupported_bitrate_is_rejected() {
        let mut encoder = LameEncoder::new();
        let bad = EncoderParams {
            bitrate_kbps: 33,
            ..params(8000)
        };
        assert!(matches!(
            encoder.initialize(bad),
            Err(EncoderError::InitFailed(_))
        ));
        let mut out = vec![0u8; 8192];
        assert_eq!(encoder.flush(&mut out), Err(EncoderError::NotInitialized));
    }

    #[test]
    fn silence_encodes_to_mp3_frames() {
        let stream = encode_second(params(8000));
        assert!(!stream.is_empty());
        // Frame sync (0xFFE) or an ID3 header
        assert!(
            (stream[0] == 0xFF && stream[1] & 0xE0 == 0xE0) || stream.starts_with(b"ID3"),
            "unexpected stream start {:02X} {:02X}",
            stream[0],
            stream[1]
        );
    }

    #[test]
    fn frames_keep_the_capture_rate() {
        for hz in [8000, 16000, 44100] {
            let stream = encode_second(params(hz));
            assert_eq!(first_frame_rate(&stream), Some(hz as u32), "capture at {hz} Hz");
        }
    }

    #[test]
    fn small_output_buffer_maps_to_lame_code() {
        let mut encoder = LameEncoder::new();
        encoder.initialize(params(8000)).unwrap();
        let pcm = vec![1000i16; 8000];
        let mut tiny = [0u8; 1];
        let err = encoder.encode(&pcm, &pcm, &mut tiny).unwrap_err();
        assert_eq!(err, EncoderError::BufferTooSmall);
        assert_eq!(err.code(), Some(-1));
    }

    #[test]
    fn crate_errors_map_to_lame_codes() {
        assert_eq!(encode_error(EncodeError::BufferTooSmall).code(), Some(-1));
        assert_eq!(encode_error(EncodeError::NoMem).code(), Some(-2));
        assert_eq!(encode_error(EncodeError::InvalidState).code(), Some(-3));
        assert_eq!(encode_error(EncodeError::PsychoAcoustic).code(), Some(-4));
        assert_eq!(encode_error(EncodeError::Other(-7)), EncoderError::Code(-7));
    }

    #[test]
    fn reinitialize_replaces_state() {
        let mut encoder = LameEncoder::new();
        encoder.initialize(params(8000)).unwrap();
        encoder.initialize(params(16000)).unwrap();
        let mut out = vec![0u8; 16_000];
        assert!(encoder.flush(&mut out).is_ok());
    }
}
