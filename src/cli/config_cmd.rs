//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::{
    Duration, EncoderParams, SampleRate, MAX_QUALITY, SUPPORTED_BITRATES,
};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(read_value(&config, key).as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(invalid(
            key,
            format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        ))
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "output" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Path must not be empty"));
            }
            config.output = Some(value.to_string());
        }
        "sample_rate" => {
            let rate = value
                .parse::<SampleRate>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.sample_rate = Some(i64::from(rate.hz()));
        }
        "bitrate" => {
            let kbps = value
                .parse::<u16>()
                .ok()
                .filter(|kbps| EncoderParams::is_supported_bitrate(*kbps))
                .ok_or_else(|| {
                    let valid: Vec<String> =
                        SUPPORTED_BITRATES.iter().map(|b| b.to_string()).collect();
                    invalid(
                        key,
                        format!("Invalid value '{}'. Valid: {}", value, valid.join(", ")),
                    )
                })?;
            config.bitrate = Some(kbps);
        }
        "quality" => {
            let quality = value
                .parse::<u8>()
                .ok()
                .filter(|q| *q <= MAX_QUALITY)
                .ok_or_else(|| {
                    invalid(key, format!("Value must be between 0 and {}", MAX_QUALITY))
                })?;
            config.quality = Some(quality);
        }
        "max_duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.max_duration = Some(value.to_string());
        }
        "device" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Device name must not be empty"));
            }
            config.device = Some(value.to_string());
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "output" => config.output.clone(),
        "sample_rate" => config.sample_rate.map(|hz| hz.to_string()),
        "bitrate" => config.bitrate.map(|b| b.to_string()),
        "quality" => config.quality.map(|q| q.to_string()),
        "max_duration" => config.max_duration.clone(),
        "device" => config.device.clone(),
        _ => None,
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}
