//! Test configuration helpers for pointing a session at a mock server

use playlist_dl::{Config, Session};
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

/// Session type driven by scripted input and captured output
pub type ScriptedSession = Session<Cursor<Vec<u8>>, Vec<u8>>;

/// Build a config whose endpoints live on `server` and whose output goes
/// to `<temp_dir>/music`
pub fn mock_config(server: &MockServer, temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.playlist_endpoint = format!("{}/playlist", server.uri());
    config.api.resolver_endpoint = format!("{}/resolve", server.uri());
    config.api.metadata_timeout = Duration::from_secs(2);
    config.api.stream_timeout = Duration::from_secs(5);
    config.download.output_dir = output_dir(temp_dir);
    config
}

/// Output directory used by [`mock_config`]
pub fn output_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("music")
}

/// Create a session that reads `lines` (one answer per line) as console input
pub fn scripted_session(config: &Config, lines: &[&str]) -> ScriptedSession {
    let mut input = lines.join("\n");
    input.push('\n');
    Session::new(config, Cursor::new(input.into_bytes()), Vec::new())
        .expect("session should build")
}

/// Everything the session printed
pub fn console_output(session: &ScriptedSession) -> String {
    String::from_utf8(session.output().clone()).expect("console output is UTF-8")
}
