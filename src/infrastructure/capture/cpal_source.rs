//! Microphone capture using cpal
//!
//! Devices are opened in whatever native format they offer (i16 or f32,
//! any channel count) at the requested sample rate. The callback downmixes
//! to mono 16-bit and hands samples to a [`SampleQueue`] that the
//! recording worker drains with blocking reads.

use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig, SupportedBufferSize, SupportedStreamConfigRange};
use tracing::{debug, error};

use super::SampleQueue;
use crate::application::ports::{AudioSource, CaptureError, CaptureStream};
use crate::domain::recording::SampleRate;

/// Longest a single read waits for audio before returning zero samples
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Preferred read granularity: a tenth of a second of audio
const MIN_BUFFER_DIVISOR: u32 = 10;

/// Default-host input device adapter
#[derive(Debug, Clone, Default)]
pub struct CpalAudioSource {
    device_name: Option<String>,
}

impl CpalAudioSource {
    /// Capture from the host's default input device
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture from the input device with this exact name
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }

    fn input_device(&self) -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        match &self.device_name {
            None => host.default_input_device().ok_or(CaptureError::NoDevice),
            Some(name) => host
                .input_devices()
                .map_err(|e| CaptureError::OpenFailed(e.to_string()))?
                .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
                .ok_or(CaptureError::NoDevice),
        }
    }

    /// Pick an i16/f32 configuration that covers `rate`, preferring fewer channels
    fn config_for(
        device: &cpal::Device,
        rate: SampleRate,
    ) -> Result<SupportedStreamConfigRange, CaptureError> {
        let hz = rate.hz();
        let supported = device
            .supported_input_configs()
            .map_err(|e| CaptureError::UnsupportedConfig(format!("{rate}: {e}")))?;

        let mut best: Option<SupportedStreamConfigRange> = None;
        for config in supported {
            if !matches!(config.sample_format(), SampleFormat::I16 | SampleFormat::F32) {
                continue;
            }
            if config.min_sample_rate().0 > hz || config.max_sample_rate().0 < hz {
                continue;
            }
            let is_better = match &best {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let native_i16 = config.channels() == current.channels()
                        && config.sample_format() == SampleFormat::I16
                        && current.sample_format() != SampleFormat::I16;
                    fewer_channels || native_i16
                }
            };
            if is_better {
                best = Some(config);
            }
        }

        best.ok_or_else(|| CaptureError::UnsupportedConfig(format!("{rate} 16-bit mono")))
    }
}

impl AudioSource for CpalAudioSource {
    type Stream = CpalCaptureStream;

    fn min_buffer_size(&self, rate: SampleRate) -> Result<usize, CaptureError> {
        let device = self.input_device()?;
        let config = Self::config_for(&device, rate)?;
        let preferred = (rate.hz() / MIN_BUFFER_DIVISOR).max(1);
        let frames = match config.buffer_size() {
            SupportedBufferSize::Range { min, max } => preferred.clamp(*min, (*max).max(*min)),
            SupportedBufferSize::Unknown => preferred,
        };
        debug!(%rate, frames, "input device minimum buffer");
        Ok(frames as usize)
    }

    fn open(&self, rate: SampleRate, capacity: usize) -> Result<Self::Stream, CaptureError> {
        let device = self.input_device()?;
        let range = Self::config_for(&device, rate)?;
        let sample_format = range.sample_format();
        let config: StreamConfig = range.with_sample_rate(cpal::SampleRate(rate.hz())).config();
        let channels = config.channels;

        let queue = Arc::new(SampleQueue::new(capacity));
        let on_error = {
            let queue = Arc::clone(&queue);
            move |err: cpal::StreamError| {
                error!(error = %err, "audio stream error");
                queue.fail(err.to_string());
            }
        };

        let stream = match sample_format {
            SampleFormat::I16 => {
                let queue = Arc::clone(&queue);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        queue.push(&downmix(data, channels));
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::F32 => {
                let queue = Arc::clone(&queue);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let pcm: Vec<i16> = data.iter().copied().map(f32_to_i16).collect();
                        queue.push(&downmix(&pcm, channels));
                    },
                    on_error,
                    None,
                )
            }
            other => {
                return Err(CaptureError::UnsupportedConfig(format!(
                    "sample format {other:?}"
                )))
            }
        }
        .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

        debug!(%rate, channels, ?sample_format, capacity, "opened input stream");
        Ok(CpalCaptureStream { stream, queue })
    }
}

/// Open cpal input stream. Not `Send`; lives on the recording worker.
pub struct CpalCaptureStream {
    stream: cpal::Stream,
    queue: Arc<SampleQueue>,
}

impl CaptureStream for CpalCaptureStream {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.queue.clear();
        self.stream
            .play()
            .map_err(|e| CaptureError::StartFailed(e.to_string()))
    }

    fn read(&mut self, buf: &mut [i16]) -> Result<usize, CaptureError> {
        self.queue
            .pop_into(buf, READ_TIMEOUT)
            .map_err(CaptureError::ReadFailed)
    }

    fn stop(&mut self) {
        if let Err(e) = self.stream.pause() {
            debug!(error = %e, "pausing input stream failed");
        }
        let dropped = self.queue.dropped();
        if dropped > 0 {
            debug!(dropped, "samples lost to capture overflow");
        }
    }

    fn release(self) {
        drop(self.stream);
    }
}

/// Average interleaved channels into one
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
