//! Mock API fixtures

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fake MP3 payload served for a track id
pub fn audio_bytes(track_id: u64) -> Vec<u8> {
    let mut bytes = b"ID3\x03\x00\x00\x00\x00\x00\x00".to_vec();
    bytes.extend(vec![(track_id % 256) as u8; 4096]);
    bytes
}

/// A track entry in the metadata API's format
pub fn track_json(id: u64, name: &str, artists: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": artists.iter().map(|a| json!({"name": a})).collect::<Vec<_>>(),
    })
}

/// Serve a successful playlist envelope for `playlist_id`
pub async fn mount_playlist(server: &MockServer, playlist_id: i64, tracks: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/playlist"))
        .and(query_param("id", playlist_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1,
            "data": tracks,
        })))
        .mount(server)
        .await;
}

/// Resolve `track_id` to `/audio/<track_id>` and serve its audio bytes
pub async fn mount_track(server: &MockServer, track_id: u64) {
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("id", track_id.to_string()))
        .and(query_param("title", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "link": format!("{}/audio/{}", server.uri(), track_id),
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/audio/{}", track_id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(audio_bytes(track_id)))
        .mount(server)
        .await;
}

/// Make the resolver answer `status` for `track_id`
pub async fn mount_resolver_status(server: &MockServer, track_id: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("id", track_id.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Resolve `track_id` to a link whose audio request answers `status`
pub async fn mount_stream_status(server: &MockServer, track_id: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("id", track_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "link": format!("{}/audio/{}", server.uri(), track_id),
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/audio/{}", track_id)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
