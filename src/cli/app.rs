//! Main app runner for recording mode

use std::future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use tokio::time::interval;
use tracing::{debug, error, info};

use crate::application::ports::{AudioSource, ConfigStore, Mp3Encoder, OutputSink};
use crate::application::{status_channel, Mp3Recorder, RecorderConfig};
use crate::domain::config::AppConfig;
use crate::domain::recording::{EncoderParams, SampleRate, MAX_QUALITY};
use crate::domain::status::StatusEvent;
use crate::infrastructure::{CpalAudioSource, FileSink, LameEncoder, XdgConfigStore};

use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// How often the elapsed-time display refreshes
const PROGRESS_INTERVAL: StdDuration = StdDuration::from_millis(250);

/// Validated settings for one recording run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOptions {
    pub output: PathBuf,
    pub sample_rate: SampleRate,
    pub bitrate: u16,
    pub quality: u8,
    pub max_duration: Option<StdDuration>,
    pub device: Option<String>,
}

impl RecordOptions {
    /// Validate merged configuration. The error is a message for the user.
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let sample_rate = config.sample_rate().map_err(|e| e.to_string())?;

        let bitrate = config.bitrate_or_default();
        if !EncoderParams::is_supported_bitrate(bitrate) {
            return Err(format!("Unsupported bitrate: {} kbps", bitrate));
        }

        let quality = config.quality_or_default();
        if quality > MAX_QUALITY {
            return Err(format!(
                "Invalid quality {}: must be between 0 and {}",
                quality, MAX_QUALITY
            ));
        }

        let max_duration = config
            .max_duration()
            .map_err(|e| e.to_string())?
            .map(|d| d.as_std());

        Ok(Self {
            output: config.output_or_default(),
            sample_rate,
            bitrate,
            quality,
            max_duration,
            device: config.device.clone(),
        })
    }

    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig::with_rate(self.output.clone(), self.sample_rate)
            .with_bitrate(self.bitrate)
            .with_quality(self.quality)
    }
}

/// Record from the chosen microphone until interrupted or the limit passes
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let source = match &options.device {
        Some(name) => {
            presenter.info(&format!("Input device: {}", name));
            CpalAudioSource::with_device(name.as_str())
        }
        None => CpalAudioSource::new(),
    };
    let recorder = Arc::new(Mp3Recorder::new(
        options.recorder_config(),
        source,
        LameEncoder::new(),
        FileSink::new(),
    ));

    let code = drive(recorder, options.max_duration, &shutdown, &mut presenter).await;
    ExitCode::from(code)
}

/// Run one session to completion, relaying status to the presenter.
///
/// Stops the recorder when `shutdown` fires or `limit` elapses, waits for
/// the worker to exit, and returns the process exit code: failure if any
/// error event was seen.
pub async fn drive<A, E, O>(
    recorder: Arc<Mp3Recorder<A, E, O>>,
    limit: Option<StdDuration>,
    shutdown: &ShutdownSignal,
    presenter: &mut Presenter,
) -> u8
where
    A: AudioSource,
    E: Mp3Encoder,
    O: OutputSink,
{
    let (listener, mut events) = status_channel();
    recorder.set_listener(Some(Arc::new(listener)));

    let path = recorder.config().path().display().to_string();
    presenter.start_spinner(&format!("Starting recording to {}", path));
    recorder.start();

    let deadline = async move {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let mut ticker = interval(PROGRESS_INTERVAL);
    let mut recording_since: Option<Instant> = None;
    let mut first_error: Option<StatusEvent> = None;
    let mut stop_requested = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(StatusEvent::RecStarted) => {
                    info!(path = %path, "recording started");
                    recording_since = Some(Instant::now());
                }
                Some(StatusEvent::RecStopped) | None => break,
                Some(event) => {
                    if event.is_error() {
                        first_error.get_or_insert(event);
                    }
                    presenter.status(event);
                }
            },
            _ = shutdown.wait(), if !stop_requested => {
                debug!("interrupted, stopping recorder");
                stop_requested = true;
                recorder.stop();
                presenter.update_spinner("Stopping...");
            }
            _ = &mut deadline, if !stop_requested => {
                debug!("recording limit reached");
                stop_requested = true;
                recorder.stop();
                presenter.update_spinner("Stopping...");
            }
            _ = ticker.tick() => {
                if let Some(since) = recording_since {
                    if !stop_requested {
                        presenter.update_recording_progress(&path, since.elapsed(), limit);
                    }
                }
            }
        }
    }

    let worker = Arc::clone(&recorder);
    if let Err(e) = tokio::task::spawn_blocking(move || worker.join()).await {
        error!(error = %e, "joining capture worker failed");
    }
    recorder.set_listener(None);

    let elapsed = recording_since.map(|since| since.elapsed()).unwrap_or_default();
    match first_error {
        Some(event) => {
            presenter.spinner_fail(&format!("Recording failed: {}", event.name()));
            EXIT_ERROR
        }
        None => {
            let took = presenter.format_elapsed(elapsed, None);
            presenter.spinner_success(&format!("Saved {} ({})", path, took));
            EXIT_SUCCESS
        }
    }
}

/// Load and merge configuration: defaults < file < CLI/env.
///
/// Environment variables arrive through clap's `env` attributes, so they are
/// already folded into `cli_config` with lower priority than flags.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            error!(path = %store.path().display(), error = %e, "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}
