//! Interactive download session
//!
//! Walks the user through one run: playlist id, track list, selection,
//! confirmation, then downloads the selected tracks in order. Each step only
//! runs if the previous one succeeded; every early exit prints a message and
//! returns normally.
//!
//! The session is generic over its console so tests can script the input.

use crate::config::Config;
use crate::downloader::TrackDownloader;
use crate::error::{Error, Result};
use crate::playlist::PlaylistFetcher;
use crate::selection::{MenuChoice, Selection, render_list, select};
use crate::types::{DownloadOutcome, DownloadReport, Playlist};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Why a run stopped before downloading anything
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// The playlist id was not an integer
    InvalidPlaylistId,
    /// The metadata API failed or returned an unusable reply
    FetchFailed,
    /// The menu choice or selection expression was rejected
    InvalidSelection,
    /// The selection resolved to no tracks
    NothingSelected,
    /// The user declined the confirmation prompt
    Cancelled,
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunSummary {
    /// Downloads were attempted; the report holds the tally
    Completed(DownloadReport),
    /// The run ended early
    Aborted(AbortReason),
}

/// One interactive run over a console reader and writer
pub struct Session<R, W> {
    fetcher: PlaylistFetcher,
    downloader: TrackDownloader,
    input: R,
    output: W,
    playlist_id: Option<i64>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session sharing one HTTP client between both APIs
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &Config, input: R, output: W) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.api.user_agent)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            fetcher: PlaylistFetcher::new(client.clone(), &config.api),
            downloader: TrackDownloader::new(client, config),
            input,
            output,
            playlist_id: None,
        })
    }

    /// Use this playlist id instead of prompting for one
    pub fn with_playlist_id(mut self, playlist_id: i64) -> Self {
        self.playlist_id = Some(playlist_id);
        self
    }

    /// The console writer
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Run the whole pipeline once
    ///
    /// # Errors
    /// Only console I/O failures are returned; every pipeline failure ends
    /// in [`RunSummary::Aborted`] or is counted in the report.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let playlist_id = match self.playlist_id {
            Some(id) => id,
            None => {
                let answer = self.prompt("Playlist id: ")?;
                match answer.trim().parse::<i64>() {
                    Ok(id) => id,
                    Err(_) => {
                        writeln!(self.output, "Invalid playlist id '{}'", answer.trim())?;
                        return Ok(RunSummary::Aborted(AbortReason::InvalidPlaylistId));
                    }
                }
            }
        };

        writeln!(self.output, "Fetching playlist {}...", playlist_id)?;
        let playlist = match self.fetcher.fetch_playlist(playlist_id).await {
            Ok(playlist) => playlist,
            Err(e) => {
                writeln!(self.output, "Failed to fetch playlist: {}", e)?;
                return Ok(RunSummary::Aborted(AbortReason::FetchFailed));
            }
        };

        writeln!(self.output, "\nFound {} tracks", playlist.len())?;
        write!(self.output, "\n{}", render_list(&playlist.tracks))?;

        let selection = match self.choose_tracks(playlist.len())? {
            Ok(selection) => selection,
            Err(reason) => return Ok(RunSummary::Aborted(reason)),
        };

        writeln!(self.output, "\n{} track(s) will be downloaded", selection.len())?;
        let answer = self.prompt("Start download? (y/n): ")?;
        if !is_affirmative(&answer) {
            writeln!(self.output, "Download cancelled")?;
            return Ok(RunSummary::Aborted(AbortReason::Cancelled));
        }

        let report = self.download_all(&playlist, &selection).await?;
        writeln!(self.output, "\nDone! Succeeded: {}", report)?;
        info!(playlist_id, %report, "Session complete");

        Ok(RunSummary::Completed(report))
    }

    /// Menu and selection prompts; the inner `Err` is a clean abort
    fn choose_tracks(
        &mut self,
        total: usize,
    ) -> Result<std::result::Result<Selection, AbortReason>> {
        writeln!(self.output, "\nDownload mode:")?;
        writeln!(self.output, "1. All tracks")?;
        writeln!(self.output, "2. Choose tracks")?;

        let answer = self.prompt("\nChoose (1/2): ")?;
        let choice = match answer.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(e) => {
                writeln!(self.output, "{}", e)?;
                return Ok(Err(AbortReason::InvalidSelection));
            }
        };

        let expression = match choice {
            MenuChoice::All => String::new(),
            MenuChoice::Pick => {
                writeln!(self.output, "\nEnter track numbers:")?;
                writeln!(self.output, "  - a single track:  3")?;
                writeln!(self.output, "  - several tracks:  1,3,5")?;
                writeln!(self.output, "  - a range:         1-5")?;
                writeln!(self.output, "  - mixed:           1,3-5,8")?;
                self.prompt("\nSelection: ")?
            }
        };

        let selection = match select(choice, &expression, total) {
            Ok(selection) => selection,
            Err(e) => {
                writeln!(self.output, "Invalid selection: {}", e)?;
                return Ok(Err(AbortReason::InvalidSelection));
            }
        };

        for warning in selection.warnings() {
            writeln!(self.output, "Warning: {}", warning)?;
        }

        if selection.is_empty() {
            writeln!(self.output, "No tracks selected, exiting")?;
            return Ok(Err(AbortReason::NothingSelected));
        }

        Ok(Ok(selection))
    }

    async fn download_all(
        &mut self,
        playlist: &Playlist,
        selection: &Selection,
    ) -> Result<DownloadReport> {
        let total = selection.len();
        let mut report = DownloadReport::default();
        writeln!(
            self.output,
            "Saving to {}",
            self.downloader.output_dir().display()
        )?;

        for (count, &index) in selection.indices().iter().enumerate() {
            let Some(track) = playlist.track(index) else {
                debug!(index, "Selected index has no track");
                continue;
            };
            let name = track.display_name();

            writeln!(self.output, "\n[{}/{}] {}", count + 1, total, name)?;
            self.output.flush()?;

            let outcome = self.downloader.download_track(&track.id, &name).await;
            match &outcome {
                DownloadOutcome::Saved { path, .. } => {
                    writeln!(self.output, "✓ Saved: {} -> {}", name, path.display())?;
                }
                DownloadOutcome::Failed(e) => {
                    writeln!(self.output, "✗ Failed: {} ({})", name, e)?;
                }
            }
            report.record(&outcome);
        }

        Ok(report)
    }

    /// Print a prompt and read one line; end of input reads as empty
    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut raw = Vec::new();
        self.input.read_until(b'\n', &mut raw)?;
        let line = String::from_utf8_lossy(&raw);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
