// ABOUTME: YouTube adapter: drops custom headers and replaces the page with the video transcript.
// ABOUTME: Calls the player-info API, records the duration, selects a caption track and fetches it.

//! YouTube transcript acquisition.
//!
//! Video pages carry no article body. In the metadata phase this adapter
//! asks the player-info endpoint about the video, stores its duration under
//! `x.duration`, downloads the best caption track and hands the transcript
//! back to the pipeline as synthetic markup with readability forced on.
//!
//! The player response is handled as a loose JSON document: every field is
//! optional and unknown fields are ignored.

pub mod captions;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::adapter::SiteAdapter;
use crate::context::ExtractionContext;
use crate::error::ExtractError;
use crate::resource;

pub use captions::{CaptionTrack, LanguageCode, TrackSelection};

/// Public player-info endpoint.
pub const PLAYER_ENDPOINT: &str = "https://youtubei.googleapis.com/youtubei/v1/player";

const DOMAIN: &str = "youtube.com";
const CLIENT_NAME: &str = "WEB";
const CLIENT_VERSION: &str = "2.20210721.00.00";

/// Metadata key holding the video identifier.
pub const IDENTIFIER_KEY: &str = "schema.identifier";
/// Metadata key receiving the video length in seconds.
pub const DURATION_KEY: &str = "x.duration";

/// Site adapter for youtube.com video pages.
#[derive(Debug, Clone)]
pub struct YoutubeAdapter {
    http: reqwest::Client,
    player_endpoint: String,
    selection: TrackSelection,
}

impl YoutubeAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            player_endpoint: PLAYER_ENDPOINT.to_string(),
            selection: TrackSelection::default(),
        }
    }

    /// Point the adapter at another player-info endpoint.
    pub fn player_endpoint(mut self, url: impl Into<String>) -> Self {
        self.player_endpoint = url.into();
        self
    }

    pub fn track_selection(mut self, selection: TrackSelection) -> Self {
        self.selection = selection;
        self
    }

    /// POST the player request for `video_id` and decode the JSON reply.
    pub async fn video_info(&self, video_id: &str) -> Result<Value, ExtractError> {
        let body = json!({
            "context": {
                "client": {
                    "hl": "en",
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                    "mainAppWebInfo": {
                        "graftUrl": format!("/watch?v={}", video_id),
                    },
                },
            },
            "videoId": video_id,
        });

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        resource::post_json(
            &self.http,
            &self.player_endpoint,
            &body,
            &headers,
            "GetVideoInfo",
        )
        .await?
        .raise_for_status("GetVideoInfo")?
        .json("GetVideoInfo")
    }

    /// Fetch the selected track and return its assembled markup, `None` without a track.
    async fn transcript(&self, info: &Value) -> Result<Option<String>, ExtractError> {
        let tracks = captions::caption_tracks(info);
        let default_index = captions::default_track_index(info);
        let Some(track) = captions::select_track(tracks, default_index, self.selection) else {
            debug!("no caption track available");
            return Ok(None);
        };
        debug!(
            language = ?track.language(),
            auto = track.auto,
            "found transcript"
        );

        let rsp = resource::get(&self.http, &track.base_url, &HashMap::new(), "GetTranscript")
            .await?
            .raise_for_status("GetTranscript")?;
        let lines = captions::parse_transcript(&rsp.text()).map_err(|e| {
            ExtractError::decode(
                &track.base_url,
                "GetTranscript",
                Some(anyhow::anyhow!("invalid transcript XML: {}", e)),
            )
        })?;

        Ok(Some(captions::assemble_transcript(&lines)))
    }
}

/// `videoDetails.lengthSeconds` as text, when present and non-empty.
fn length_seconds(info: &Value) -> Option<String> {
    match info.pointer("/videoDetails/lengthSeconds")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl SiteAdapter for YoutubeAdapter {
    fn name(&self) -> &str {
        "youtube"
    }

    fn is_active(&self, ctx: &ExtractionContext) -> bool {
        ctx.domain == DOMAIN
    }

    /// Custom headers upset the player API; send none.
    fn set_config(&self, ctx: &mut ExtractionContext) {
        ctx.http_headers.clear();
    }

    async fn process_meta(&self, ctx: &mut ExtractionContext) -> Result<(), ExtractError> {
        let Some(video_id) = ctx.meta.first(IDENTIFIER_KEY).map(str::to_string) else {
            return Ok(());
        };

        let info = self.video_info(&video_id).await?;

        if let Some(duration) = length_seconds(&info) {
            ctx.meta.set(DURATION_KEY, vec![duration]);
        }

        if let Some(html) = self.transcript(&info).await? {
            ctx.html = html;
            // video pages are never run through readability otherwise
            ctx.readability = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    fn adapter(server: &MockServer) -> YoutubeAdapter {
        YoutubeAdapter::new(reqwest::Client::new()).player_endpoint(server.url("/youtubei/v1/player"))
    }

    fn video_ctx(id: Option<&str>) -> ExtractionContext {
        let mut ctx = ExtractionContext::new("https://www.youtube.com/watch?v=abc").unwrap();
        if let Some(id) = id {
            ctx.meta.push(IDENTIFIER_KEY, id);
        }
        ctx.html = "<html><body>player</body></html>".to_string();
        ctx.readability = false;
        ctx
    }

    #[test]
    fn active_on_youtube_domain_only() {
        let adapter = YoutubeAdapter::new(reqwest::Client::new());
        assert!(adapter.is_active(&ExtractionContext::new("https://www.youtube.com/watch").unwrap()));
        assert!(adapter.is_active(&ExtractionContext::new("https://m.youtube.com/watch").unwrap()));
        assert!(!adapter.is_active(&ExtractionContext::new("https://youtu.be/abc").unwrap()));
    }

    #[test]
    fn set_config_clears_headers() {
        let mut ctx = video_ctx(None);
        ctx.http_headers.insert("Accept-Language".into(), "en".into());
        YoutubeAdapter::new(reqwest::Client::new()).set_config(&mut ctx);
        assert!(ctx.http_headers.is_empty());
    }

    #[test]
    fn length_seconds_accepts_strings_and_numbers() {
        assert_eq!(
            length_seconds(&json!({"videoDetails": {"lengthSeconds": "634"}})),
            Some("634".to_string())
        );
        assert_eq!(
            length_seconds(&json!({"videoDetails": {"lengthSeconds": 12}})),
            Some("12".to_string())
        );
        assert_eq!(length_seconds(&json!({"videoDetails": {"lengthSeconds": ""}})), None);
        assert_eq!(length_seconds(&json!({})), None);
    }

    #[tokio::test]
    async fn missing_identifier_is_a_no_op() {
        // nothing is mocked: any outbound call would answer 404 and fail the hook
        let server = MockServer::start();

        let mut ctx = video_ctx(None);
        adapter(&server).process_meta(&mut ctx).await.unwrap();

        assert_eq!(ctx.html, "<html><body>player</body></html>");
        assert!(!ctx.readability);
        assert!(ctx.meta.is_empty());
    }

    #[tokio::test]
    async fn video_info_request_shape() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/youtubei/v1/player")
                .header("content-type", "application/json")
                .json_body(json!({
                    "context": {
                        "client": {
                            "hl": "en",
                            "clientName": "WEB",
                            "clientVersion": "2.20210721.00.00",
                            "mainAppWebInfo": {"graftUrl": "/watch?v=vid123"}
                        }
                    },
                    "videoId": "vid123"
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"videoDetails":{"lengthSeconds":"5"}}"#);
        });

        let info = adapter(&server).video_info("vid123").await.unwrap();
        mock.assert();
        assert_eq!(info["videoDetails"]["lengthSeconds"], "5");
    }

    #[tokio::test]
    async fn player_failure_propagates_without_changes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/youtubei/v1/player");
            then.status(403).body("forbidden");
        });

        let mut ctx = video_ctx(Some("vid123"));
        let err = adapter(&server).process_meta(&mut ctx).await.unwrap_err();

        assert!(err.is_status());
        assert!(ctx.meta.get(DURATION_KEY).is_empty());
        assert!(!ctx.readability);
    }

    #[tokio::test]
    async fn no_captions_keeps_page_but_sets_duration() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/youtubei/v1/player");
            then.status(200)
                .body(r#"{"videoDetails":{"lengthSeconds":"634"},"captions":{}}"#);
        });

        let mut ctx = video_ctx(Some("vid123"));
        adapter(&server).process_meta(&mut ctx).await.unwrap();

        assert_eq!(ctx.meta.get(DURATION_KEY), ["634"]);
        assert_eq!(ctx.html, "<html><body>player</body></html>");
        assert!(!ctx.readability);
    }

    #[tokio::test]
    async fn blank_transcript_still_replaces_page() {
        let server = MockServer::start();
        let player = json!({
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {"languageCode": "en", "baseUrl": server.url("/timedtext?lang=en")}
                    ]
                }
            }
        })
        .to_string();
        server.mock(|when, then| {
            when.method(POST).path("/youtubei/v1/player");
            then.status(200).body(player.clone());
        });
        server.mock(|when, then| {
            when.method(GET).path("/timedtext");
            then.status(200)
                .body(r#"<transcript><text start="0"></text></transcript>"#);
        });

        let mut ctx = video_ctx(Some("vid123"));
        adapter(&server).process_meta(&mut ctx).await.unwrap();

        assert_eq!(ctx.html, r#"<section id="main"><p></p></section>"#);
        assert!(ctx.readability);
    }
}
