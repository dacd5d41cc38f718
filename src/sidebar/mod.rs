//! In-page transcript sidebar
//!
//! The panel lives in the host page's DOM; this module owns its lifecycle
//! from the Rust side. A [`SidebarSession`] binds one video identifier to
//! one panel instance; video changes destroy and recreate the pair as a
//! unit, so stale content is never shown against a new identifier.

pub mod js_scripts;

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use serde::Serialize;
use tracing::debug;

use crate::transcript::{CaptionTrack, Transcript};

/// One rendered transcript entry as the panel displays it
#[derive(Debug, Serialize)]
struct EntryView {
    time: String,
    text: String,
    dir: &'static str,
}

/// A single active sidebar bound to one video identifier.
///
/// Create with [`SidebarSession::install`]; replace the whole session on
/// video change; call [`SidebarSession::destroy`] on teardown. There is at
/// most one live session per host page.
#[derive(Debug)]
pub struct SidebarSession {
    video_id: String,
}

impl SidebarSession {
    /// Build the panel for a video and insert the player Summarize button
    pub async fn install(page: &Page, video_id: impl Into<String>) -> Result<Self> {
        let video_id = video_id.into();
        call(page, js_scripts::PANEL_SETUP_FN, &[&json(&video_id)?])
            .await
            .context("Failed to install sidebar panel")?;
        // Player controls may not exist yet; the watch loop re-runs this
        call(page, js_scripts::SUMMARIZE_BUTTON_FN, &[]).await.ok();
        debug!(video_id = %video_id, "Sidebar installed");
        Ok(Self { video_id })
    }

    /// Video identifier this session is bound to
    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Retry inserting the player Summarize button (controls render late)
    pub async fn ensure_summarize_button(&self, page: &Page) -> Result<()> {
        call(page, js_scripts::SUMMARIZE_BUTTON_FN, &[]).await?;
        Ok(())
    }

    /// Render a transcript into the panel body
    pub async fn render(&self, page: &Page, transcript: &Transcript) -> Result<()> {
        let entries: Vec<EntryView> = transcript
            .events
            .iter()
            .map(|event| {
                let text = event.text();
                EntryView {
                    time: format_timestamp(event.start_ms),
                    dir: text_direction(&text),
                    text,
                }
            })
            .collect();
        call(
            page,
            js_scripts::RENDER_ENTRIES_FN,
            &[&serde_json::to_string(&entries)?],
        )
        .await
        .context("Failed to render transcript entries")?;
        self.set_title(page, &format!("Transcript - {}", self.video_id))
            .await
    }

    /// Render the no-transcript state
    pub async fn render_empty(&self, page: &Page, title: &str) -> Result<()> {
        call(page, js_scripts::RENDER_ENTRIES_FN, &[&"[]".to_string()]).await?;
        self.set_title(page, &format!("{title} - {}", self.video_id))
            .await
    }

    /// Populate the language selector
    pub async fn show_tracks(
        &self,
        page: &Page,
        tracks: &[CaptionTrack],
        current_language: &str,
    ) -> Result<()> {
        call(
            page,
            js_scripts::SET_TRACKS_FN,
            &[&serde_json::to_string(tracks)?, &json(current_language)?],
        )
        .await
        .context("Failed to populate language selector")?;
        Ok(())
    }

    async fn set_title(&self, page: &Page, title: &str) -> Result<()> {
        call(page, js_scripts::SET_TITLE_FN, &[&json(title)?]).await?;
        Ok(())
    }

    /// Remove the panel and player button from the page
    pub async fn destroy(self, page: &Page) -> Result<()> {
        call(page, js_scripts::DESTROY_FN, &[]).await?;
        debug!(video_id = %self.video_id, "Sidebar destroyed");
        Ok(())
    }
}

/// Evaluate an arrow-function source with JSON-encoded arguments
async fn call(page: &Page, function: &str, args: &[&String]) -> Result<()> {
    let call_args = args
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    page.evaluate(format!("({function})({call_args})"))
        .await
        .context("Sidebar script evaluation failed")?;
    Ok(())
}

fn json(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Format a millisecond offset as HH:MM:SS
#[must_use]
pub fn format_timestamp(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Per-entry display direction: rtl when the text contains characters from
/// the Arabic Unicode block. Display hint only.
#[must_use]
pub fn text_direction(text: &str) -> &'static str {
    if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        "rtl"
    } else {
        "ltr"
    }
}

/// Newline-joined clipboard payload for the displayed entries, no trailing
/// newline
#[must_use]
pub fn join_transcript<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_renders_hours_minutes_seconds() {
        assert_eq!(format_timestamp(0), "00:00:00");
        assert_eq!(format_timestamp(3_723_000), "01:02:03");
        assert_eq!(format_timestamp(59_999), "00:00:59");
    }

    #[test]
    fn arabic_text_is_rtl() {
        assert_eq!(text_direction("مرحبا بالعالم"), "rtl");
        assert_eq!(text_direction("hello world"), "ltr");
        assert_eq!(text_direction("mixed مرحبا line"), "rtl");
    }

    #[test]
    fn copy_payload_is_newline_joined_without_trailer() {
        assert_eq!(join_transcript(&["Hello", "world"]), "Hello\nworld");
        assert_eq!(join_transcript::<&str>(&[]), "");
        assert_eq!(join_transcript(&["solo"]), "solo");
    }
}
