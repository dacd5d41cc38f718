//! Data structures for caption tracks and transcripts
//!
//! The wire shapes mirror what the host page actually embeds: a player
//! response object carrying the caption track list, and a json3 caption
//! payload of timed events. Both are tolerant of missing fields: a shape
//! mismatch means "no captions", never a hard failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One available caption stream for a video, in one language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptionTrack {
    /// BCP-47-ish language code as the host reports it (e.g. "en", "en-US")
    pub language_code: String,

    /// Human-readable track label shown in the language selector
    pub display_name: String,

    /// Base URL of the caption payload; the format parameter is appended at
    /// fetch time
    pub source_url: String,
}

/// One timed caption entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptEvent {
    /// Offset from video start, in milliseconds
    pub start_ms: u64,

    /// Text segments in delivery order
    pub segments: Vec<String>,
}

impl TranscriptEvent {
    /// Segment texts joined into the displayed line
    #[must_use]
    pub fn text(&self) -> String {
        self.segments.join(" ")
    }
}

/// A full transcript for one language, replaced wholesale on language or
/// video change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    pub language: String,
    pub events: Vec<TranscriptEvent>,
}

/// Terminal result of polling the host document for caption metadata.
///
/// `Absent` is a confirmed outcome after the poll budget is exhausted, not a
/// transient failure; callers render the "no captions" state and stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionScan {
    Found(Vec<CaptionTrack>),
    Absent,
}

impl CaptionScan {
    /// Track list view; `Absent` reads as an empty slice
    #[must_use]
    pub fn tracks(&self) -> &[CaptionTrack] {
        match self {
            Self::Found(tracks) => tracks,
            Self::Absent => &[],
        }
    }
}

/// Attempt budget and spacing for the embedded-data poll loop.
///
/// The host page streams script tags in, so the player blob may not exist at
/// first look. These are opaque tuning values carried from observed behavior
/// of the host; the defaults give up after roughly five seconds.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval_ms: 500,
        }
    }
}

/// Error types for caption payload retrieval
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Payload fetch failed at the HTTP layer
    #[error("Caption payload request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload arrived but was not the expected json3 shape
    #[error("Caption payload parse failed: {0}")]
    Payload(#[from] serde_json::Error),

    /// The track's source URL could not be extended with the format parameter
    #[error("Invalid caption source URL '{url}': {source}")]
    SourceUrl {
        url: String,
        source: url::ParseError,
    },
}

// ---------------------------------------------------------------------------
// Embedded player-response wire model
// ---------------------------------------------------------------------------

/// Root of the embedded player initialization blob.
///
/// Only the caption branch is modeled; everything else in the blob is
/// ignored by serde.
#[derive(Debug, Deserialize)]
pub(crate) struct PlayerResponse {
    pub(crate) captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    pub(crate) renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TracklistRenderer {
    #[serde(rename = "captionTracks", default)]
    pub(crate) caption_tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    #[serde(rename = "languageCode")]
    pub(crate) language_code: String,

    #[serde(default)]
    pub(crate) name: Option<RawTrackName>,

    #[serde(rename = "baseUrl")]
    pub(crate) base_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrackName {
    #[serde(rename = "simpleText", default)]
    pub(crate) simple_text: Option<String>,
}

impl RawTrack {
    pub(crate) fn into_track(self) -> CaptionTrack {
        let display_name = self
            .name
            .and_then(|n| n.simple_text)
            .unwrap_or_else(|| self.language_code.clone());
        CaptionTrack {
            language_code: self.language_code,
            display_name,
            source_url: self.base_url,
        }
    }
}

// ---------------------------------------------------------------------------
// json3 caption payload wire model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CaptionPayload {
    #[serde(default)]
    pub(crate) events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    #[serde(rename = "tStartMs", default)]
    pub(crate) t_start_ms: u64,

    /// Absent on pure timing markers
    #[serde(default)]
    pub(crate) segs: Vec<RawSeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSeg {
    #[serde(default)]
    pub(crate) utf8: String,
}
