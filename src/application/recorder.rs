//! Capture -> encode -> write pipeline
//!
//! One [`Mp3Recorder`] owns at most one background worker at a time. The
//! worker pulls mono PCM from an [`AudioSource`], feeds it to an
//! [`Mp3Encoder`] and appends the encoded bytes to an [`OutputFile`].
//! Nothing crosses back to the caller except [`StatusEvent`]s.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use tracing::{debug, error, info, warn};

use super::notifier::StatusNotifier;
use super::ports::{
    AudioSource, CaptureStream, Mp3Encoder, OutputFile, OutputSink, StatusListener,
};
use crate::domain::error::InvalidSampleRate;
use crate::domain::recording::{
    EncoderParams, PipelineState, SampleRate, SessionBuffers, DEFAULT_BITRATE_KBPS,
    DEFAULT_QUALITY,
};
use crate::domain::status::StatusEvent;

/// Pause after a read that returned no samples, so an idle device does not
/// pin a core. Bounded by one poll, so `stop()` is still seen promptly.
pub const ZERO_READ_BACKOFF: StdDuration = StdDuration::from_millis(5);

/// Capacity requested from the device, as a multiple of its minimum buffer.
/// The minimum alone overflows on some platforms' capture threads.
const DEVICE_BUFFER_FACTOR: usize = 2;

/// Per-recorder settings, validated before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    path: PathBuf,
    sample_rate: SampleRate,
    bitrate_kbps: u16,
    quality: u8,
}

impl RecorderConfig {
    /// Fails with [`InvalidSampleRate`] when `sample_rate_hz <= 0`.
    pub fn new(path: impl Into<PathBuf>, sample_rate_hz: i64) -> Result<Self, InvalidSampleRate> {
        Ok(Self::with_rate(path, SampleRate::new(sample_rate_hz)?))
    }

    pub fn with_rate(path: impl Into<PathBuf>, sample_rate: SampleRate) -> Self {
        Self {
            path: path.into(),
            sample_rate,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn with_bitrate(mut self, kbps: u16) -> Self {
        self.bitrate_kbps = kbps;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn bitrate_kbps(&self) -> u16 {
        self.bitrate_kbps
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Mono in, same rate out
    pub fn encoder_params(&self) -> EncoderParams {
        EncoderParams::mono(self.sample_rate, self.bitrate_kbps, self.quality)
    }
}

/// Cloneable handle that can stop a recorder from another thread or task.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl StopHandle {
    /// Signal the worker to finish. Never blocks; safe in any state.
    pub fn stop(&self) {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            match PipelineState::from_u8(current) {
                PipelineState::Starting | PipelineState::Recording => {
                    match self.state.compare_exchange(
                        current,
                        PipelineState::Stopping.as_u8(),
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    ) {
                        Ok(_) => break,
                        Err(actual) => current = actual,
                    }
                }
                _ => break,
            }
        }
        // After the transition: a worker that raced to Recording has already
        // raised the flag, so this store wins.
        self.running.store(false, Ordering::Release);
    }
}

/// Microphone-to-MP3 recorder.
pub struct Mp3Recorder<A, E, O>
where
    A: AudioSource,
    E: Mp3Encoder,
    O: OutputSink,
{
    config: Arc<RecorderConfig>,
    source: Arc<A>,
    encoder: Arc<Mutex<E>>,
    sink: Arc<O>,
    running: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    notifier: StatusNotifier,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<A, E, O> Mp3Recorder<A, E, O>
where
    A: AudioSource,
    E: Mp3Encoder,
    O: OutputSink,
{
    pub fn new(config: RecorderConfig, source: A, encoder: E, sink: O) -> Self {
        Self {
            config: Arc::new(config),
            source: Arc::new(source),
            encoder: Arc::new(Mutex::new(encoder)),
            sink: Arc::new(sink),
            running: Arc::new(AtomicBool::new(false)),
            state: Arc::new(AtomicU8::new(PipelineState::Idle.as_u8())),
            notifier: StatusNotifier::new(),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Install or clear the status listener. Without one, events are dropped.
    pub fn set_listener(&self, listener: Option<Arc<dyn StatusListener>>) {
        self.notifier.set_listener(listener);
    }

    /// Start a session on a new worker thread.
    ///
    /// Returns immediately. Does nothing unless the recorder is idle, so a
    /// second call while a session is starting, running or shutting down
    /// never creates a second worker.
    pub fn start(&self) {
        if self
            .state
            .compare_exchange(
                PipelineState::Idle.as_u8(),
                PipelineState::Starting.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            debug!(state = %self.state(), "start ignored, session already active");
            return;
        }

        let session = Session {
            config: Arc::clone(&self.config),
            source: Arc::clone(&self.source),
            encoder: Arc::clone(&self.encoder),
            sink: Arc::clone(&self.sink),
            running: Arc::clone(&self.running),
            state: Arc::clone(&self.state),
            notifier: self.notifier.clone(),
        };

        let spawned = thread::Builder::new()
            .name("mp3rec-capture".to_string())
            .spawn(move || session.run());

        match spawned {
            Ok(handle) => {
                let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
                *worker = Some(handle);
            }
            Err(e) => {
                error!(error = %e, "failed to spawn capture worker");
                self.state
                    .store(PipelineState::Idle.as_u8(), Ordering::Release);
                self.notifier.emit(StatusEvent::ErrorRecStart);
                self.notifier.emit(StatusEvent::RecStopped);
            }
        }
    }

    /// Ask the current session to finish. Returns immediately; the worker
    /// notices within one read cycle and runs its full shutdown.
    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
            state: Arc::clone(&self.state),
        }
    }

    /// The running flag at call time. Advisory only: the worker may flip it
    /// right after this returns.
    pub fn is_recording(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn state(&self) -> PipelineState {
        PipelineState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Block until the current worker, if any, has exited.
    ///
    /// Call this before `start()` when reusing a recorder right after
    /// `REC_STOPPED`; the worker returns to idle just after emitting it.
    pub fn join(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("capture worker panicked");
            }
        }
    }
}

impl<A, E, O> Drop for Mp3Recorder<A, E, O>
where
    A: AudioSource,
    E: Mp3Encoder,
    O: OutputSink,
{
    fn drop(&mut self) {
        // The worker owns its resources and finishes cleanup on its own
        self.stop();
    }
}

/// Everything one worker needs, moved onto its thread.
struct Session<A, E, O>
where
    A: AudioSource,
    E: Mp3Encoder,
    O: OutputSink,
{
    config: Arc<RecorderConfig>,
    source: Arc<A>,
    encoder: Arc<Mutex<E>>,
    sink: Arc<O>,
    running: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    notifier: StatusNotifier,
}

/// Runs the tail of every session, including when the worker unwinds:
/// clear the flag, report `REC_STOPPED`, go idle.
struct SessionEnd<'a> {
    running: &'a AtomicBool,
    state: &'a AtomicU8,
    notifier: &'a StatusNotifier,
}

impl Drop for SessionEnd<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        self.notifier.emit(StatusEvent::RecStopped);
        self.state
            .store(PipelineState::Idle.as_u8(), Ordering::Release);
    }
}

impl<A, E, O> Session<A, E, O>
where
    A: AudioSource,
    E: Mp3Encoder,
    O: OutputSink,
{
    fn run(self) {
        let _end = SessionEnd {
            running: &self.running,
            state: &self.state,
            notifier: &self.notifier,
        };
        info!(
            path = %self.config.path().display(),
            rate = %self.config.sample_rate(),
            "recording session starting"
        );
        self.capture();
    }

    fn emit(&self, event: StatusEvent) {
        self.notifier.emit(event);
    }

    fn capture(&self) {
        let rate = self.config.sample_rate();

        let min_buffer = match self.source.min_buffer_size(rate) {
            Ok(0) => {
                warn!(%rate, "device reported a zero minimum buffer");
                self.emit(StatusEvent::ErrorGetMinBufferSize);
                return;
            }
            Ok(size) => size,
            Err(e) => {
                warn!(%rate, error = %e, "minimum buffer size query failed");
                self.emit(StatusEvent::ErrorGetMinBufferSize);
                return;
            }
        };
        debug!(min_buffer, "minimum buffer size");

        let mut stream = match self
            .source
            .open(rate, min_buffer.saturating_mul(DEVICE_BUFFER_FACTOR))
        {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "failed to open capture stream");
                self.emit(StatusEvent::ErrorRecStart);
                return;
            }
        };

        let file = match self.sink.create(self.config.path()) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "failed to create output file");
                self.emit(StatusEvent::ErrorCreateFile);
                stream.release();
                return;
            }
        };

        let mut encoder = self.encoder.lock().unwrap_or_else(PoisonError::into_inner);
        match encoder.initialize(self.config.encoder_params()) {
            Ok(()) => self.record(&mut *encoder, &mut stream, file, min_buffer),
            Err(e) => {
                warn!(error = %e, "encoder initialization failed");
                self.emit(StatusEvent::ErrorAudioEncode);
                drop(file);
            }
        }

        stream.stop();
        stream.release();
        encoder.close();
        debug!("device released, encoder closed");
    }

    /// Steps from raising the running flag to closing the file.
    fn record(&self, encoder: &mut E, stream: &mut A::Stream, mut file: O::File, min_buffer: usize) {
        let mut buffers = SessionBuffers::for_rate(self.config.sample_rate());
        let read_len = min_buffer.min(buffers.frame().len());

        self.running.store(true, Ordering::Release);
        if self
            .state
            .compare_exchange(
                PipelineState::Starting.as_u8(),
                PipelineState::Recording.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            debug!("stop requested before capture began");
            self.running.store(false, Ordering::Release);
        }

        if let Err(e) = stream.start() {
            warn!(error = %e, "failed to start capture stream");
            self.emit(StatusEvent::ErrorRecStart);
            return;
        }
        self.emit(StatusEvent::RecStarted);

        let mut bytes_written: u64 = 0;
        while self.running.load(Ordering::Acquire) {
            let (frame, encoded) = buffers.split_mut();

            let read = match stream.read(&mut frame[..read_len]) {
                Ok(read) => read.min(read_len),
                Err(e) => {
                    warn!(error = %e, "capture read failed");
                    self.emit(StatusEvent::ErrorAudioRecord);
                    break;
                }
            };
            if read == 0 {
                thread::sleep(ZERO_READ_BACKOFF);
                continue;
            }

            let pcm = &frame[..read];
            let produced = match encoder.encode(pcm, pcm, encoded) {
                Ok(produced) => produced.min(encoded.len()),
                Err(e) => {
                    warn!(error = %e, code = ?e.code(), samples = read, "encode failed");
                    self.emit(StatusEvent::ErrorAudioEncode);
                    break;
                }
            };
            if produced == 0 {
                continue;
            }
            if let Err(e) = file.write_all(&encoded[..produced]) {
                warn!(error = %e, "write failed");
                self.emit(StatusEvent::ErrorWriteFile);
                break;
            }
            bytes_written += produced as u64;
        }

        let (_, encoded) = buffers.split_mut();
        match encoder.flush(encoded) {
            Ok(0) => {}
            Ok(produced) => {
                let produced = produced.min(encoded.len());
                match file.write_all(&encoded[..produced]) {
                    Ok(()) => bytes_written += produced as u64,
                    Err(e) => {
                        warn!(error = %e, "write of flushed frames failed");
                        self.emit(StatusEvent::ErrorWriteFile);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, code = ?e.code(), "encoder flush failed");
                self.emit(StatusEvent::ErrorAudioEncode);
            }
        }

        if let Err(e) = file.close() {
            warn!(error = %e, "closing output failed");
            self.emit(StatusEvent::ErrorCloseFile);
        }
        info!(bytes_written, "recording session finished");
    }
}
