//! Interactive command line front end for playlist-dl

use clap::Parser;
use playlist_dl::{Config, Session};
use std::io;
use std::path::PathBuf;
use tracing::{Level, debug};

/// Fetch a playlist, pick tracks, and download them
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to save tracks into (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Playlist id; prompted for when omitted
    #[arg(short, long)]
    playlist_id: Option<i64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(io::stderr)
        .init();

    // Config::from_file validates
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(output_dir) = args.output_dir {
        config.download.output_dir = output_dir;
    }

    let mut session = Session::new(&config, io::stdin().lock(), io::stdout().lock())?;
    if let Some(playlist_id) = args.playlist_id {
        session = session.with_playlist_id(playlist_id);
    }

    let summary = session.run().await?;
    debug!(?summary, "Exiting");

    Ok(())
}
