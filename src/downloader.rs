//! Track link resolution and audio download
//!
//! Each track goes through two requests:
//! 1. `GET {resolver_endpoint}?id=<track id>&title=<bool>` returning `{"link": "..."}`
//! 2. `GET <link>` streamed chunk by chunk into the output directory
//!
//! Failures in either phase are returned as a [`DownloadOutcome::Failed`]
//! rather than an error, so a batch keeps going after a bad track.

use crate::config::{Config, FileCollisionAction};
use crate::error::{DownloadError, Error, Phase, Result};
use crate::types::{DownloadOutcome, TrackId};
use crate::utils::{get_unique_path, sanitize_filename, temp_path_for};
use futures::StreamExt;
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Resolver reply; anything without a non-empty `link` is unusable
#[derive(Debug, Default, Deserialize)]
struct ResolverResponse {
    #[serde(default)]
    link: Option<String>,
}

/// Resolves tracks to audio links and saves them to disk
pub struct TrackDownloader {
    /// HTTP client shared with the rest of the session
    client: reqwest::Client,

    /// Resolver endpoint URL
    resolver_endpoint: String,

    /// Timeout for the resolver request
    resolve_timeout: Duration,

    /// Longest the audio transfer may sit idle, both waiting for headers and
    /// between body chunks
    stream_timeout: Duration,

    /// Value of the resolver's `title` flag
    embed_title: bool,

    /// Directory receiving the audio files
    output_dir: PathBuf,

    /// File extension without the leading dot
    extension: String,

    /// What to do when the target file exists
    file_collision: FileCollisionAction,
}

impl TrackDownloader {
    /// Create a downloader using an existing client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            resolver_endpoint: config.api.resolver_endpoint.clone(),
            resolve_timeout: config.api.metadata_timeout,
            stream_timeout: config.api.stream_timeout,
            embed_title: config.download.embed_title,
            output_dir: config.download.output_dir.clone(),
            extension: config.download.extension.trim_start_matches('.').to_string(),
            file_collision: config.download.file_collision,
        }
    }

    /// Create a downloader with its own client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.api.user_agent)
            .build()
            .map_err(Error::Network)?;
        Ok(Self::new(client, config))
    }

    /// Directory receiving the audio files
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve and save one track
    ///
    /// Never fails outright: every error is folded into the outcome.
    pub async fn download_track(
        &self,
        track_id: &TrackId,
        display_name: &str,
    ) -> DownloadOutcome {
        match self.try_download(track_id, display_name).await {
            Ok((path, bytes)) => {
                info!(%track_id, path = %path.display(), bytes, "Track saved");
                DownloadOutcome::Saved { path, bytes }
            }
            Err(e) => {
                warn!(%track_id, name = display_name, error = %e, "Track download failed");
                DownloadOutcome::Failed(e)
            }
        }
    }

    async fn try_download(
        &self,
        track_id: &TrackId,
        display_name: &str,
    ) -> std::result::Result<(PathBuf, u64), DownloadError> {
        let link = self.resolve_link(track_id).await?;
        let response = self.open_stream(&link).await?;
        let path = self.prepare_target(track_id, display_name).await?;
        let bytes = stream_to_file(response, &path, self.stream_timeout).await?;
        Ok((path, bytes))
    }

    /// Ask the resolver for a direct audio link
    ///
    /// # Errors
    /// - [`DownloadError::BadStatus`] if the resolver does not answer 200
    /// - [`DownloadError::MissingLink`] if the reply has no usable `link`
    /// - [`DownloadError::Timeout`] / [`DownloadError::Network`] on transport failure
    pub async fn resolve_link(
        &self,
        track_id: &TrackId,
    ) -> std::result::Result<String, DownloadError> {
        debug!(%track_id, endpoint = %self.resolver_endpoint, "Resolving audio link");

        let title = if self.embed_title { "true" } else { "false" };
        let response = self
            .client
            .get(&self.resolver_endpoint)
            .query(&[("id", track_id.to_string().as_str()), ("title", title)])
            .timeout(self.resolve_timeout)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(Phase::Resolve, &e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::BadStatus {
                phase: Phase::Resolve,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::from_reqwest(Phase::Resolve, &e))?;

        let reply: ResolverResponse = match serde_json::from_slice(&body) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(%track_id, error = %e, "Resolver reply is not JSON");
                ResolverResponse::default()
            }
        };

        reply
            .link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty())
            .ok_or(DownloadError::MissingLink)
    }

    async fn open_stream(
        &self,
        link: &str,
    ) -> std::result::Result<reqwest::Response, DownloadError> {
        debug!(link, "Requesting audio stream");

        // Headers only; body chunks get their own idle timeout in write_body
        let request = self.client.get(link).send();
        let response = tokio::time::timeout(self.stream_timeout, request)
            .await
            .map_err(|_| DownloadError::Timeout {
                phase: Phase::Stream,
            })?
            .map_err(|e| DownloadError::from_reqwest(Phase::Stream, &e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::BadStatus {
                phase: Phase::Stream,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Create the output directory and pick the final file path
    async fn prepare_target(
        &self,
        track_id: &TrackId,
        display_name: &str,
    ) -> std::result::Result<PathBuf, DownloadError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| DownloadError::IoFailure {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self.output_dir.join(self.file_name(track_id, display_name));
        get_unique_path(&path, self.file_collision)
            .map_err(|source| DownloadError::IoFailure { path, source })
    }

    /// File name for a track: sanitized display name plus extension
    ///
    /// Falls back to `track-<id>` when nothing survives sanitization.
    pub fn file_name(&self, track_id: &TrackId, display_name: &str) -> String {
        let mut stem = sanitize_filename(display_name);
        if stem.is_empty() {
            stem = format!("track-{}", sanitize_filename(&track_id.to_string()));
        }
        format!("{}.{}", stem, self.extension)
    }
}

/// Stream a response body into `path`, returning the number of bytes written
///
/// Bytes go to a `.part` file next to `path` which is renamed into place once
/// the body is complete. The part file is removed on failure.
///
/// `idle_timeout` bounds the wait for each chunk, not the whole transfer, so
/// a slow but steady stream completes.
pub async fn stream_to_file(
    response: reqwest::Response,
    path: &Path,
    idle_timeout: Duration,
) -> std::result::Result<u64, DownloadError> {
    let temp_path = temp_path_for(path);
    let result = write_body(response, &temp_path, idle_timeout).await;

    match result {
        Ok(written) => {
            fs::rename(&temp_path, path)
                .await
                .map_err(|source| DownloadError::IoFailure {
                    path: path.to_path_buf(),
                    source,
                })?;
            debug!(path = %path.display(), bytes = written, "Stream complete");
            Ok(written)
        }
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                debug!(path = %temp_path.display(), error = %cleanup, "Could not remove partial file");
            }
            Err(e)
        }
    }
}

async fn write_body(
    response: reqwest::Response,
    temp_path: &Path,
    idle_timeout: Duration,
) -> std::result::Result<u64, DownloadError> {
    let io_failure = |source: std::io::Error| DownloadError::IoFailure {
        path: temp_path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(temp_path).await.map_err(io_failure)?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    loop {
        let next = tokio::time::timeout(idle_timeout, stream.next())
            .await
            .map_err(|_| DownloadError::Timeout {
                phase: Phase::Stream,
            })?;
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(|e| DownloadError::from_reqwest(Phase::Stream, &e))?;
        file.write_all(&chunk).await.map_err(io_failure)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(io_failure)?;
    Ok(written)
}
