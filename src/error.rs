//! Error types for playlist-dl
//!
//! Each pipeline stage has its own closed error enumeration:
//! - [`FetchError`] for playlist metadata retrieval
//! - [`SelectionError`] for parsing the user's track selection
//! - [`DownloadError`] for per-track link resolution and audio streaming
//!
//! [`Error`] wraps all of them for callers that only need a single type.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for playlist-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for playlist-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.stream_timeout")
        key: Option<String>,
    },

    /// Playlist metadata could not be fetched
    #[error("playlist fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Track selection was rejected
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// A single track failed to download
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// HTTP client construction or transport error outside a pipeline stage
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error (console or filesystem)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Playlist metadata errors
///
/// Any of these is fatal to the run: the track list must not be used.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, body read)
    #[error("network error: {0}")]
    Network(String),

    /// The metadata endpoint answered with a non-success HTTP status
    #[error("metadata endpoint returned HTTP {0}")]
    HttpStatus(u16),

    /// The body was readable but its status code did not signal success
    #[error("playlist API reported failure (code: {})", display_code(.code))]
    BadStatus {
        /// The `code` field from the body, if present and numeric
        code: Option<i64>,
    },

    /// The body could not be interpreted as a playlist
    #[error("malformed playlist response: {0}")]
    Malformed(String),
}

fn display_code(code: &Option<i64>) -> String {
    code.map_or_else(|| "missing".to_string(), |c| c.to_string())
}

/// Selection parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A token was not an integer or an `A-B` range of integers
    ///
    /// One bad token rejects the whole expression.
    #[error("invalid selection token '{0}'")]
    InvalidToken(String),

    /// The top-level menu answer was neither "all" nor "pick"
    #[error("invalid menu choice '{0}'")]
    InvalidMenuChoice(String),
}

/// Which network phase of a track download failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Asking the resolver endpoint for a direct audio link
    Resolve,
    /// Streaming the audio bytes from the resolved link
    Stream,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Resolve => write!(f, "link resolution"),
            Phase::Stream => write!(f, "audio download"),
        }
    }
}

/// Per-track download errors
///
/// These never abort a batch; the session reports them and moves on.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A request exceeded its timeout
    #[error("{phase} timed out")]
    Timeout {
        /// The phase that timed out
        phase: Phase,
    },

    /// An endpoint answered with a non-200 status
    #[error("{phase} failed with HTTP {status}")]
    BadStatus {
        /// The phase that received the status
        phase: Phase,
        /// HTTP status code
        status: u16,
    },

    /// The resolver answered 200 but gave no usable link
    #[error("resolver returned no audio link")]
    MissingLink,

    /// Any other transport error
    #[error("{phase} failed: {message}")]
    Network {
        /// The phase that failed
        phase: Phase,
        /// Underlying error message
        message: String,
    },

    /// Creating, writing or renaming the output file failed
    #[error("failed to write {}: {source}", .path.display())]
    IoFailure {
        /// The file or directory being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Classify a transport error from the given phase
    pub(crate) fn from_reqwest(phase: Phase, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            DownloadError::Timeout { phase }
        } else {
            DownloadError::Network {
                phase,
                message: error.to_string(),
            }
        }
    }

    /// Returns true if the failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, DownloadError::Timeout { .. })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_status_message_shows_code_or_missing() {
        let with_code = FetchError::BadStatus { code: Some(-1) };
        assert_eq!(
            with_code.to_string(),
            "playlist API reported failure (code: -1)"
        );

        let without_code = FetchError::BadStatus { code: None };
        assert_eq!(
            without_code.to_string(),
            "playlist API reported failure (code: missing)"
        );
    }

    #[test]
    fn download_error_messages_name_the_phase() {
        let resolve = DownloadError::BadStatus {
            phase: Phase::Resolve,
            status: 404,
        };
        assert_eq!(resolve.to_string(), "link resolution failed with HTTP 404");

        let stream = DownloadError::Timeout {
            phase: Phase::Stream,
        };
        assert_eq!(stream.to_string(), "audio download timed out");
        assert!(stream.is_timeout());
        assert!(!resolve.is_timeout());
    }

    #[test]
    fn io_failure_includes_path() {
        let err = DownloadError::IoFailure {
            path: PathBuf::from("music/song.mp3"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("music/song.mp3"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
    }

    #[test]
    fn stage_errors_convert_into_main_error() {
        let err: Error = SelectionError::InvalidToken("abc".into()).into();
        assert!(matches!(err, Error::Selection(SelectionError::InvalidToken(_))));

        let err: Error = FetchError::HttpStatus(500).into();
        assert_eq!(
            err.to_string(),
            "playlist fetch failed: metadata endpoint returned HTTP 500"
        );
    }
}
