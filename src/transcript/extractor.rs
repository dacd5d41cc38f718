//! Caption track discovery and transcript loading
//!
//! Discovery polls the host document for the embedded player blob: the page
//! streams script tags in, so the blob may simply not be there yet. A parse
//! failure is treated the same as absence, retried until the budget runs
//! out, at which point [`CaptionScan::Absent`] is the confirmed terminal
//! state. Transcript loading is a single fetch with no automatic retry.

use std::future::Future;
use std::time::Duration;

use chromiumoxide::page::Page;
use tracing::{debug, warn};
use url::Url;

use super::types::{
    CaptionPayload, CaptionScan, CaptionTrack, PlayerResponse, PollPolicy, Transcript,
    TranscriptError, TranscriptEvent,
};

/// Probe evaluated in the host page: returns the raw player-response JSON as
/// a string, or null while the blob has not rendered yet.
///
/// Prefers the already-parsed global; falls back to scanning inline script
/// text the way the blob is actually delivered.
const PLAYER_RESPONSE_PROBE: &str = r#"
    (() => {
        if (window.ytInitialPlayerResponse) {
            try {
                return JSON.stringify(window.ytInitialPlayerResponse);
            } catch (e) {}
        }
        const scripts = Array.from(document.getElementsByTagName('script'));
        const holder = scripts.find(s => s.textContent.includes('ytInitialPlayerResponse'));
        if (!holder) return null;
        const match = holder.textContent.match(/ytInitialPlayerResponse\s*=\s*({.+?})\s*;/);
        return match ? match[1] : null;
    })()
"#;

/// Poll for caption track metadata using a caller-supplied document probe.
///
/// The probe returns the raw embedded JSON when present. Each poll that
/// yields nothing usable (missing blob, unparseable blob, empty track list)
/// consumes one attempt; the budget exhausting is the typed `Absent`
/// terminal, not an error.
pub async fn poll_caption_tracks<F, Fut>(mut probe: F, policy: &PollPolicy) -> CaptionScan
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<String>>,
{
    for attempt in 1..=policy.max_attempts {
        if let Some(raw) = probe().await {
            match parse_caption_tracks(&raw) {
                Some(tracks) if !tracks.is_empty() => {
                    debug!(attempt, tracks = tracks.len(), "Caption tracks found");
                    return CaptionScan::Found(tracks);
                }
                // Not parseable yet, or parseable but trackless: keep polling
                _ => debug!(attempt, "Player data present but no usable tracks yet"),
            }
        } else {
            debug!(attempt, "Player data not present yet");
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(Duration::from_millis(policy.interval_ms)).await;
        }
    }

    debug!(
        attempts = policy.max_attempts,
        "Caption poll budget exhausted, treating as no captions"
    );
    CaptionScan::Absent
}

/// Poll a live CDP page for caption tracks
pub async fn fetch_caption_tracks(page: &Page, policy: &PollPolicy) -> CaptionScan {
    poll_caption_tracks(
        move || async move {
            match page.evaluate(PLAYER_RESPONSE_PROBE).await {
                Ok(result) => result
                    .value()
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string),
                Err(e) => {
                    debug!("Player response probe failed: {e}");
                    None
                }
            }
        },
        policy,
    )
    .await
}

/// Parse the embedded player-response JSON into caption tracks.
///
/// Returns None for malformed JSON ("not yet available" to the poll loop)
/// and an empty vec when the blob parses but carries no caption branch.
pub(crate) fn parse_caption_tracks(raw: &str) -> Option<Vec<CaptionTrack>> {
    let response: PlayerResponse = serde_json::from_str(raw).ok()?;
    let tracks = response
        .captions
        .and_then(|c| c.renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .map(super::types::RawTrack::into_track)
        .collect();
    Some(tracks)
}

/// Pick the track to load for a requested language.
///
/// Preference order: exact language-code prefix match, then a display name
/// containing "english" (case-insensitive), then the first track as given.
#[must_use]
pub fn select_track<'a>(tracks: &'a [CaptionTrack], language_code: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code.starts_with(language_code))
        .or_else(|| {
            tracks
                .iter()
                .find(|t| t.display_name.to_lowercase().contains("english"))
        })
        .or_else(|| tracks.first())
}

/// Load the transcript for the requested language.
///
/// Selects a track per [`select_track`], fetches its payload, and drops
/// events that carry no text segments (pure timing markers). Any network or
/// parse failure yields None; the caller renders a "no transcript" state
/// and does not retry.
pub async fn load_transcript(
    client: &reqwest::Client,
    tracks: &[CaptionTrack],
    language_code: &str,
) -> Option<Transcript> {
    let track = select_track(tracks, language_code)?;

    match fetch_track_payload(client, track).await {
        Ok(events) => Some(Transcript {
            language: track.language_code.clone(),
            events,
        }),
        Err(e) => {
            warn!(
                language = %track.language_code,
                "Transcript load failed: {e}"
            );
            None
        }
    }
}

/// Fetch and decode one track's json3 payload
async fn fetch_track_payload(
    client: &reqwest::Client,
    track: &CaptionTrack,
) -> Result<Vec<TranscriptEvent>, TranscriptError> {
    let mut url =
        Url::parse(&track.source_url).map_err(|source| TranscriptError::SourceUrl {
            url: track.source_url.clone(),
            source,
        })?;
    url.query_pairs_mut().append_pair("fmt", "json3");

    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_payload(&body)
}

/// Decode a json3 payload body, keeping only events with text segments
pub(crate) fn parse_payload(body: &str) -> Result<Vec<TranscriptEvent>, TranscriptError> {
    let payload: CaptionPayload = serde_json::from_str(body)?;
    Ok(payload
        .events
        .into_iter()
        .filter(|e| !e.segs.is_empty())
        .map(|e| TranscriptEvent {
            start_ms: e.t_start_ms,
            segments: e.segs.into_iter().map(|s| s.utf8).collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, name: &str) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            display_name: name.to_string(),
            source_url: "https://host.example/timedtext".to_string(),
        }
    }

    #[test]
    fn prefix_match_beats_english_name() {
        let tracks = vec![track("fr", "French"), track("en-US", "English (US)")];
        let picked = select_track(&tracks, "en").unwrap();
        assert_eq!(picked.language_code, "en-US");
    }

    #[test]
    fn english_name_beats_input_order() {
        let tracks = vec![track("fr", "French"), track("de", "English (auto)")];
        let picked = select_track(&tracks, "en").unwrap();
        assert_eq!(picked.language_code, "de");
    }

    #[test]
    fn falls_back_to_first_track() {
        let tracks = vec![track("fr", "French"), track("de", "German")];
        let picked = select_track(&tracks, "en").unwrap();
        assert_eq!(picked.language_code, "fr");
    }

    #[test]
    fn no_tracks_selects_nothing() {
        assert!(select_track(&[], "en").is_none());
    }

    #[test]
    fn parses_embedded_track_list() {
        let raw = r#"{
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {
                            "languageCode": "en",
                            "name": {"simpleText": "English"},
                            "baseUrl": "https://host.example/timedtext?lang=en"
                        },
                        {
                            "languageCode": "ar",
                            "baseUrl": "https://host.example/timedtext?lang=ar"
                        }
                    ]
                }
            }
        }"#;
        let tracks = parse_caption_tracks(raw).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].display_name, "English");
        // Display name falls back to the language code when unnamed
        assert_eq!(tracks[1].display_name, "ar");
    }

    #[test]
    fn captionless_blob_parses_to_empty() {
        let tracks = parse_caption_tracks(r#"{"videoDetails": {}}"#).unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn malformed_blob_reads_as_not_yet_available() {
        assert!(parse_caption_tracks("{truncated").is_none());
    }

    #[test]
    fn timing_markers_are_dropped() {
        let body = r#"{
            "events": [
                {"tStartMs": 0, "segs": [{"utf8": "Hello"}]},
                {"tStartMs": 1200},
                {"tStartMs": 2400, "segs": [{"utf8": "world"}, {"utf8": "again"}]}
            ]
        }"#;
        let events = parse_payload(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].text(), "Hello");
        assert_eq!(events[1].text(), "world again");
        assert_eq!(events[1].start_ms, 2400);
    }
}
