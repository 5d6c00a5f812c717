//! Core types for playlist-dl

use crate::error::DownloadError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Opaque track identifier
///
/// The metadata API returns numeric ids, but strings are accepted too and
/// passed to the resolver unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    /// Numeric id
    Number(i64),
    /// String id
    Text(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Number(id) => write!(f, "{}", id),
            TrackId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        TrackId::Number(id)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        TrackId::Text(id.to_string())
    }
}

/// An artist credited on a track
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Artist name, empty if the API omitted it
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// One entry of a playlist
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Identifier passed to the resolver endpoint
    pub id: TrackId,

    /// Track title, empty if the API omitted it
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Credited artists in API order
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<Artist>,
}

impl Track {
    /// Create a track with a numeric id
    pub fn new(id: i64, name: impl Into<String>, artists: &[&str]) -> Self {
        Self {
            id: TrackId::Number(id),
            name: name.into(),
            artists: artists
                .iter()
                .map(|name| Artist {
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    /// Artist names joined with ", "
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `"{name} - {artists}"`, used for console output and the file name
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.artist_names())
    }
}

/// A successfully fetched playlist
///
/// Only constructed when the metadata API reported success, so holding one
/// means the track list is safe to use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playlist {
    /// The id the playlist was requested with
    pub id: i64,
    /// Tracks in playlist order
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns true if the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Look up a track by its 1-based position
    pub fn track(&self, index: usize) -> Option<&Track> {
        index.checked_sub(1).and_then(|i| self.tracks.get(i))
    }
}

/// Result of downloading a single track
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The audio was written to `path`
    Saved {
        /// Final location of the file
        path: PathBuf,
        /// Number of bytes written
        bytes: u64,
    },
    /// The track was skipped; the batch continues
    Failed(DownloadError),
}

impl DownloadOutcome {
    /// Returns true if the track was saved
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Saved { .. })
    }
}

/// Tally of a download batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Tracks saved
    pub succeeded: usize,
    /// Tracks attempted
    pub attempted: usize,
}

impl DownloadReport {
    /// Count one outcome
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        self.attempted += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        }
    }
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.attempted)
    }
}

// Treats an explicit JSON null like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
