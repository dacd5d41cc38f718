//! Caption extraction from the host video page
//!
//! Discovers caption track metadata embedded in the host page's player
//! initialization blob, then fetches and decodes the json3 payload for a
//! chosen language.

mod extractor;
mod types;

pub use extractor::{fetch_caption_tracks, load_transcript, poll_caption_tracks, select_track};
pub use types::{
    CaptionScan, CaptionTrack, PollPolicy, Transcript, TranscriptError, TranscriptEvent,
};
