//! Configuration types for playlist-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote API settings (endpoints, timeouts, client identity)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Playlist metadata endpoint, queried with `?id=<playlist id>`
    #[serde(default = "default_playlist_endpoint")]
    pub playlist_endpoint: String,

    /// Track resolver endpoint, queried with `?id=<track id>&title=<bool>`
    #[serde(default = "default_resolver_endpoint")]
    pub resolver_endpoint: String,

    /// Timeout for metadata and resolver requests (default: 10 seconds)
    #[serde(default = "default_metadata_timeout", with = "duration_serde")]
    pub metadata_timeout: Duration,

    /// Timeout for a whole audio stream (default: 30 seconds)
    #[serde(default = "default_stream_timeout", with = "duration_serde")]
    pub stream_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            playlist_endpoint: default_playlist_endpoint(),
            resolver_endpoint: default_resolver_endpoint(),
            metadata_timeout: default_metadata_timeout(),
            stream_timeout: default_stream_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Where and how downloaded tracks are written
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Output directory, created on first successful stream (default: "./music")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File extension for saved tracks, without the dot (default: "mp3")
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Ask the resolver to embed title metadata (default: true)
    #[serde(default = "default_true")]
    pub embed_title: bool,

    /// What to do when the target file already exists
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extension: default_extension(),
            embed_title: true,
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// File collision handling
///
/// Two different display names can sanitize to the same file name. The
/// default keeps the last-writer-wins behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Replace the existing file (default)
    #[default]
    Overwrite,
    /// Append " (1)", " (2)", ... to the file stem
    Rename,
    /// Leave the existing file alone and fail the track
    Skip,
}

/// Main configuration for playlist-dl
///
/// Every field has a default, so an empty JSON object is a valid config file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Output settings
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Load a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read config file '{}': {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that endpoints parse as URLs and numeric limits are usable
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("api.playlist_endpoint", &self.api.playlist_endpoint),
            ("api.resolver_endpoint", &self.api.resolver_endpoint),
        ] {
            if let Err(e) = url::Url::parse(value) {
                return Err(Error::Config {
                    message: format!("'{}' is not a valid URL: {}", value, e),
                    key: Some(key.to_string()),
                });
            }
        }

        if self.api.metadata_timeout.is_zero() {
            return Err(Error::Config {
                message: "timeout must be at least one second".to_string(),
                key: Some("api.metadata_timeout".to_string()),
            });
        }
        if self.api.stream_timeout.is_zero() {
            return Err(Error::Config {
                message: "timeout must be at least one second".to_string(),
                key: Some("api.stream_timeout".to_string()),
            });
        }

        let extension = self.download.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(Error::Config {
                message: format!("invalid file extension '{}'", self.download.extension),
                key: Some("download.extension".to_string()),
            });
        }

        Ok(())
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.download.output_dir
    }
}

fn default_playlist_endpoint() -> String {
    "https://www.oiapi.net/api/NeteasePlaylistDetail".to_string()
}

fn default_resolver_endpoint() -> String {
    "https://api.paugram.com/netease".to_string()
}

fn default_metadata_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_stream_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("playlist-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("music")
}

fn default_extension() -> String {
    "mp3".to_string()
}

fn default_true() -> bool {
    true
}

// Durations are stored as whole seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
