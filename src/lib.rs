//! # playlist-dl
//!
//! Fetches a playlist's track list from a metadata API, lets the user pick
//! tracks, resolves each pick to a direct audio link through a second API and
//! streams the audio into a local directory.
//!
//! The pipeline is strictly sequential: one request at a time, one track at
//! a time. A failed track is reported and skipped; it never stops the batch.
//!
//! ## Quick Start
//!
//! ```no_run
//! use playlist_dl::{Config, PlaylistFetcher, TrackDownloader, parse_selection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let fetcher = PlaylistFetcher::from_config(&config.api)?;
//!     let downloader = TrackDownloader::from_config(&config)?;
//!
//!     let playlist = fetcher.fetch_playlist(24381616).await?;
//!     let selection = parse_selection("1,3-5", playlist.len())?;
//!
//!     for &index in selection.indices() {
//!         if let Some(track) = playlist.track(index) {
//!             let outcome = downloader
//!                 .download_track(&track.id, &track.display_name())
//!                 .await;
//!             println!("{}: {:?}", track.display_name(), outcome);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Track link resolution and audio download
pub mod downloader;
/// Error types
pub mod error;
/// Playlist metadata retrieval
pub mod playlist;
/// Track list rendering and selection parsing
pub mod selection;
/// Interactive download session
pub mod session;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{ApiConfig, Config, DownloadConfig, FileCollisionAction};
pub use downloader::TrackDownloader;
pub use error::{DownloadError, Error, FetchError, Phase, Result, SelectionError};
pub use playlist::PlaylistFetcher;
pub use selection::{MenuChoice, Selection, SelectionWarning, parse_selection, render_list};
pub use session::{AbortReason, RunSummary, Session};
pub use types::{Artist, DownloadOutcome, DownloadReport, Playlist, Track, TrackId};
