// ABOUTME: Caption-track model, track selection heuristics and transcript assembly for YouTube.
// ABOUTME: Reads tracks from the player response, ranks them, and turns timed-text XML into markup.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde_json::Value;

/// Language codes in preference order. Codes not listed rank after all of these.
const LANG_PRIORITY: &[LanguageCode<'static>] = &[
    LanguageCode::Code("en"),
    LanguageCode::Absent,
    LanguageCode::Null,
    LanguageCode::Code(""),
];

/// Separator placed between transcript lines.
const LINE_BREAK: &str = "<br>\n";

/// How a track is chosen when the player response names a default one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackSelection {
    /// A located default track is used as is; ranking only runs without one.
    #[default]
    DefaultTrackFirst,
    /// Ignore the default track and always rank.
    AlwaysRank,
}

/// The `languageCode` of a track, keeping a missing key apart from `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCode<'a> {
    Code(&'a str),
    Null,
    Absent,
}

/// One available transcript stream for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// `None` when the key is missing, `Some(None)` when it is `null`.
    pub language_code: Option<Option<String>>,
    /// True for automatic speech recognition tracks (`kind == "asr"`).
    pub auto: bool,
    pub base_url: String,
}

impl CaptionTrack {
    fn from_json(value: &Value) -> Self {
        Self {
            language_code: value
                .get("languageCode")
                .map(|v| v.as_str().map(str::to_string)),
            auto: value.get("kind").and_then(Value::as_str) == Some("asr"),
            base_url: value
                .get("baseUrl")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn language(&self) -> LanguageCode<'_> {
        match &self.language_code {
            None => LanguageCode::Absent,
            Some(None) => LanguageCode::Null,
            Some(Some(code)) => LanguageCode::Code(code),
        }
    }

    fn language_rank(&self) -> usize {
        let code = self.language();
        LANG_PRIORITY
            .iter()
            .position(|p| *p == code)
            .unwrap_or(LANG_PRIORITY.len())
    }
}

/// Caption tracks listed in a player response, empty when absent.
pub fn caption_tracks(info: &Value) -> Vec<CaptionTrack> {
    info.pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .and_then(Value::as_array)
        .map(|tracks| tracks.iter().map(CaptionTrack::from_json).collect())
        .unwrap_or_default()
}

/// Index of the caption track paired with the default audio track, if any.
pub fn default_track_index(info: &Value) -> Option<usize> {
    info.pointer("/captions/playerCaptionsTracklistRenderer/audioTracks")
        .and_then(Value::as_array)?
        .iter()
        .find(|t| t.get("hasDefaultTrack").and_then(Value::as_bool) == Some(true))?
        .get("defaultCaptionTrackIndex")
        .and_then(Value::as_u64)
        .map(|i| i as usize)
}

/// Order tracks manual first, then by language preference. Stable.
pub fn rank_tracks(tracks: &mut [CaptionTrack]) {
    tracks.sort_by_key(|t| (t.auto, t.language_rank()));
}

/// Pick the track whose transcript gets fetched.
pub fn select_track(
    mut tracks: Vec<CaptionTrack>,
    default_index: Option<usize>,
    policy: TrackSelection,
) -> Option<CaptionTrack> {
    if policy == TrackSelection::DefaultTrackFirst {
        if let Some(idx) = default_index {
            return tracks.into_iter().nth(idx);
        }
    }

    rank_tracks(&mut tracks);
    tracks.into_iter().next()
}

/// Text of every `<text>` node under `<transcript>`, in document order.
pub fn parse_transcript(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut lines = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "text" && path.len() == 1 && path[0] == "transcript" {
                    current = Some(String::new());
                }
                path.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if name.as_ref() == b"text" && path.len() == 1 && path[0] == "transcript" {
                    lines.push(String::new());
                }
            }
            Event::Text(e) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&e.decode()?);
                }
            }
            Event::CData(e) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(buf) = current.as_mut() {
                    if let Some(ch) = e.resolve_char_ref()? {
                        buf.push(ch);
                    } else {
                        let name = e.decode()?;
                        match resolve_predefined_entity(&name) {
                            Some(resolved) => buf.push_str(resolved),
                            None => {
                                buf.push('&');
                                buf.push_str(&name);
                                buf.push(';');
                            }
                        }
                    }
                }
            }
            Event::End(_) => {
                path.pop();
                if path.len() == 1 {
                    if let Some(text) = current.take() {
                        lines.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines)
}

/// Join non-empty transcript lines into the synthetic article markup.
///
/// A transcript without any text still yields an empty paragraph.
pub fn assemble_transcript(lines: &[String]) -> String {
    let kept: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| !l.is_empty())
        .collect();
    format!(
        r#"<section id="main"><p>{}</p></section>"#,
        kept.join(LINE_BREAK)
    )
}
