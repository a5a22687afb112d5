//! TOML settings file under the user config directory
//!
//! Saves go through a sibling `.tmp` file and a rename, so a reader never
//! sees a half-written config.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

const APP_DIR: &str = "mp3rec";
const FILE_NAME: &str = "config.toml";

/// Config store rooted at `$XDG_CONFIG_HOME/mp3rec/config.toml`
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        Self::with_path(base.join(APP_DIR).join(FILE_NAME))
    }

    /// Store backed by an explicit file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn ensure_parent(&self) -> Result<(), ConfigError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).await.map_err(write_error)
            }
            _ => Ok(()),
        }
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(text: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn encode(config: &AppConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
}

fn write_error(e: std::io::Error) -> ConfigError {
    ConfigError::WriteError(e.to_string())
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => decode(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AppConfig::empty()),
            Err(e) => Err(ConfigError::ReadError(e.to_string())),
        }
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let text = encode(config)?;
        self.ensure_parent().await?;

        let staging = self.staging_path();
        fs::write(&staging, text).await.map_err(write_error)?;
        if let Err(e) = fs::rename(&staging, &self.path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(write_error(e));
        }

        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        let text = encode(&AppConfig::defaults())?;
        self.ensure_parent().await?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => ConfigError::AlreadyExists(display(&self.path)),
                _ => write_error(e),
            })?;
        file.write_all(text.as_bytes()).await.map_err(write_error)?;
        file.sync_all().await.map_err(write_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> XdgConfigStore {
        XdgConfigStore::with_path(dir.path().join("mp3rec").join(FILE_NAME))
    }

    #[test]
    fn default_path_ends_in_app_dir() {
        let path = XdgConfigStore::new().path();
        assert!(path.ends_with("mp3rec/config.toml"));
    }

    #[test]
    fn staging_file_sits_beside_config() {
        let store = XdgConfigStore::with_path("/etc/mp3rec/config.toml");
        assert_eq!(
            store.staging_path(),
            PathBuf::from("/etc/mp3rec/config.toml.tmp")
        );
    }

    #[test]
    fn decode_reads_every_key() {
        let config = decode(
            r#"
output = "meeting.mp3"
sample_rate = 16000
bitrate = 64
quality = 5
max_duration = "10m"
device = "USB Mic"
"#,
        )
        .unwrap();
        assert_eq!(config.output.as_deref(), Some("meeting.mp3"));
        assert_eq!(config.sample_rate, Some(16000));
        assert_eq!(config.bitrate, Some(64));
        assert_eq!(config.quality, Some(5));
        assert_eq!(config.max_duration.as_deref(), Some("10m"));
        assert_eq!(config.device.as_deref(), Some("USB Mic"));
    }

    #[test]
    fn decode_rejects_wrong_types() {
        assert!(matches!(
            decode("sample_rate = \"fast\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn unset_keys_are_omitted() {
        let text = encode(&AppConfig {
            bitrate: Some(128),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(text.trim(), "bitrate = 128");
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.exists());
        assert_eq!(store.load().await.unwrap(), AppConfig::empty());
    }

    #[tokio::test]
    async fn directory_in_place_of_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let store = XdgConfigStore::with_path(dir.path());
        assert!(matches!(
            store.load().await,
            Err(ConfigError::ReadError(_))
        ));
    }

    #[tokio::test]
    async fn save_replaces_and_leaves_no_staging_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&AppConfig::defaults()).await.unwrap();
        let updated = AppConfig {
            output: Some("later.mp3".to_string()),
            ..AppConfig::empty()
        };
        store.save(&updated).await.unwrap();

        assert_eq!(store.load().await.unwrap(), updated);
        assert!(!store.staging_path().exists());
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.init().await.unwrap();
        assert!(store.exists());
        assert_eq!(store.load().await.unwrap(), AppConfig::defaults());

        assert!(matches!(
            store.init().await,
            Err(ConfigError::AlreadyExists(_))
        ));
    }
}
