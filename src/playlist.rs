//! Playlist metadata retrieval
//!
//! Issues a single `GET {playlist_endpoint}?id=<playlist id>` and turns the
//! reply into a [`Playlist`]. The endpoint answers with a JSON envelope:
//!
//! ```json
//! {"code": 1, "data": [{"id": 1, "name": "Song", "artists": [{"name": "A"}]}]}
//! ```
//!
//! Anything other than `code == 1` is a failure; there is no retry.

use crate::config::ApiConfig;
use crate::error::{Error, FetchError, Result};
use crate::types::{Playlist, Track};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// The `code` value the metadata API uses for success
const SUCCESS_CODE: i64 = 1;

/// Fetches playlist metadata from the configured endpoint
pub struct PlaylistFetcher {
    /// HTTP client shared with the rest of the session
    client: reqwest::Client,

    /// Metadata endpoint URL
    endpoint: String,

    /// Per-request timeout
    timeout: Duration,
}

impl PlaylistFetcher {
    /// Create a fetcher using an existing client
    pub fn new(client: reqwest::Client, api: &ApiConfig) -> Self {
        Self {
            client,
            endpoint: api.playlist_endpoint.clone(),
            timeout: api.metadata_timeout,
        }
    }

    /// Create a fetcher with its own client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&api.user_agent)
            .build()
            .map_err(Error::Network)?;
        Ok(Self::new(client, api))
    }

    /// Fetch a playlist by id
    ///
    /// # Errors
    /// - [`FetchError::Network`] if no response arrived (including timeout)
    /// - [`FetchError::HttpStatus`] for a non-2xx reply
    /// - [`FetchError::BadStatus`] if the body's `code` is not `1`
    /// - [`FetchError::Malformed`] if the body is not a playlist envelope
    pub async fn fetch_playlist(
        &self,
        playlist_id: i64,
    ) -> std::result::Result<Playlist, FetchError> {
        debug!(playlist_id, endpoint = %self.endpoint, "Fetching playlist");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id", playlist_id)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out after {:?}", self.timeout)
                } else {
                    e.to_string()
                };
                FetchError::Network(message)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(playlist_id, status = status.as_u16(), "Playlist request rejected");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read response body: {}", e)))?;

        let playlist = parse_playlist_response(playlist_id, &body)?;
        debug!(playlist_id, tracks = playlist.len(), "Parsed playlist");
        Ok(playlist)
    }
}

/// Interpret a metadata response body
///
/// A missing or null `data` array with a success code yields an empty
/// playlist. Individual tracks tolerate missing `name` and `artists`, but a
/// track without an `id` makes the whole response malformed.
pub fn parse_playlist_response(
    playlist_id: i64,
    body: &[u8],
) -> std::result::Result<Playlist, FetchError> {
    let mut envelope: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::Malformed(format!("body is not JSON: {}", e)))?;

    let code = envelope.get("code").and_then(Value::as_i64);
    if code != Some(SUCCESS_CODE) {
        return Err(FetchError::BadStatus { code });
    }

    let tracks = match envelope.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => Vec::new(),
        Some(data) => serde_json::from_value::<Vec<Track>>(data)
            .map_err(|e| FetchError::Malformed(format!("invalid track list: {}", e)))?,
    };

    Ok(Playlist {
        id: playlist_id,
        tracks,
    })
}
