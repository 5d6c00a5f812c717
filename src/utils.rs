//! Utility functions for file naming and path manipulation

use crate::config::FileCollisionAction;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Strip a display name down to characters that are safe in a file name
///
/// Keeps alphanumeric characters (any script), spaces, hyphens, underscores
/// and parentheses, then trims surrounding whitespace. Different names can
/// map to the same result.
///
/// # Examples
///
/// ```
/// use playlist_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Song: Title? (Live)"), "Song Title (Live)");
/// assert_eq!(sanitize_filename("  AC/DC - T.N.T.  "), "ACDC - TNT");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Pick the path a track is saved to when `path` may already exist
///
/// `Overwrite` always returns `path`. If nothing is at `path` yet, every
/// action returns it unchanged. Otherwise `Skip` fails with `AlreadyExists`
/// naming the file, and `Rename` tries `stem (1).ext`, `stem (2).ext`, ...
///
/// # Examples
///
/// ```
/// use playlist_dl::utils::get_unique_path;
/// use playlist_dl::config::FileCollisionAction;
/// use std::path::Path;
///
/// let path = Path::new("/tmp/song.mp3");
/// let unique = get_unique_path(path, FileCollisionAction::Overwrite).unwrap();
/// assert_eq!(unique, path);
/// ```
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> io::Result<PathBuf> {
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        _ if !path.exists() => Ok(path.to_path_buf()),
        FileCollisionAction::Skip => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} is already saved, skipping", path.display()),
        )),
        FileCollisionAction::Rename => (1..=MAX_RENAME_ATTEMPTS)
            .map(|n| numbered_path(path, n))
            .find(|candidate| !candidate.exists())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!(
                        "no free name left for {} after {} tries",
                        path.display(),
                        MAX_RENAME_ATTEMPTS
                    ),
                )
            }),
    }
}

// `music/Song.mp3` + 2 -> `music/Song (2).mp3`
fn numbered_path(path: &Path, n: u32) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(format!(" ({})", n));
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

/// Path of the partial file a download streams into before the final rename
///
/// `music/song.mp3` becomes `music/song.mp3.part`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn sanitize_strips_punctuation_keeps_parens() {
        assert_eq!(sanitize_filename("Song: Title? (Live)"), "Song Title (Live)");
    }

    #[test]
    fn sanitize_keeps_hyphen_underscore_and_unicode() {
        assert_eq!(sanitize_filename("晴天 - 周杰伦"), "晴天 - 周杰伦");
        assert_eq!(sanitize_filename("my_song-remix"), "my_song-remix");
        assert_eq!(sanitize_filename("Café del Mar"), "Café del Mar");
    }

    #[test]
    fn sanitize_removes_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename(r"a\b/c"), "abc");
    }

    #[test]
    fn sanitize_trims_after_filtering() {
        // The leading '*' goes first, then the space it exposed is trimmed
        assert_eq!(sanitize_filename("* Song *"), "Song");
        assert_eq!(sanitize_filename("?!."), "");
    }

    #[test]
    fn sanitize_collisions_are_not_disambiguated() {
        assert_eq!(sanitize_filename("Song?"), sanitize_filename("Song!"));
    }

    #[test]
    fn free_path_is_kept_for_every_action() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");

        for action in [
            FileCollisionAction::Overwrite,
            FileCollisionAction::Rename,
            FileCollisionAction::Skip,
        ] {
            assert_eq!(get_unique_path(&path, action).unwrap(), path);
        }
    }

    #[test]
    fn overwrite_reuses_existing_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");
        fs::write(&path, "original").unwrap();

        assert_eq!(
            get_unique_path(&path, FileCollisionAction::Overwrite).unwrap(),
            path
        );
    }

    #[test]
    fn rename_counts_up_past_taken_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");
        fs::write(&path, "original").unwrap();

        let first = get_unique_path(&path, FileCollisionAction::Rename).unwrap();
        assert_eq!(first, temp_dir.path().join("song (1).mp3"));

        fs::write(&first, "first").unwrap();
        let second = get_unique_path(&path, FileCollisionAction::Rename).unwrap();
        assert_eq!(second, temp_dir.path().join("song (2).mp3"));
    }

    #[test]
    fn rename_keeps_parens_in_stem() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Song (Live).mp3");
        fs::write(&path, "original").unwrap();

        let unique = get_unique_path(&path, FileCollisionAction::Rename).unwrap();
        assert_eq!(unique, temp_dir.path().join("Song (Live) (1).mp3"));
    }

    #[test]
    fn skip_names_the_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");
        fs::write(&path, "original").unwrap();

        let err = get_unique_path(&path, FileCollisionAction::Skip).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(err.to_string().contains("song.mp3"), "got: {err}");
    }

    #[test]
    fn rename_without_extension_appends_counter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("track-42");
        fs::write(&path, "original").unwrap();

        let unique = get_unique_path(&path, FileCollisionAction::Rename).unwrap();
        assert_eq!(unique, temp_dir.path().join("track-42 (1)"));
    }

    #[test]
    fn temp_path_appends_part_suffix() {
        assert_eq!(
            temp_path_for(Path::new("music/Song - A.mp3")),
            PathBuf::from("music/Song - A.mp3.part")
        );
    }
}
