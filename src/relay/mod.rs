//! Message relay between the host page and the injector worker
//!
//! The sidebar queues messages in page context (`window.__tubescribeQueue`);
//! the watch loop drains that queue each tick and forwards summarize
//! requests over an mpsc channel to the injector. Delivery is fire-and-forget
//! from the page's perspective; nothing in the panel waits on an outcome.

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Drains and clears the in-page message queue, returning it as JSON
const DRAIN_QUEUE_SCRIPT: &str = r#"
    (() => {
        const queue = window.__tubescribeQueue || [];
        window.__tubescribeQueue = [];
        return JSON.stringify(queue);
    })()
"#;

/// Messages raised from page context, tagged by their `type` field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageMessage {
    /// Summarize the currently displayed transcript
    Summarize { transcript: String },
    /// Switch the sidebar transcript language
    SetLanguage { language: String },
}

/// A summarize request on its way to the injector worker
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    pub transcript: String,
}

/// Drain pending page messages from the host page.
///
/// Unknown message shapes are dropped with a log line rather than failing
/// the tick.
pub async fn drain_page_messages(page: &Page) -> Result<Vec<PageMessage>> {
    let result = page
        .evaluate(DRAIN_QUEUE_SCRIPT)
        .await
        .context("Failed to drain page message queue")?;
    let raw = result
        .value()
        .and_then(|v| v.as_str())
        .unwrap_or("[]")
        .to_string();

    let values: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("Page message queue was not a JSON array")?;

    let mut messages = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<PageMessage>(value.clone()) {
            Ok(message) => messages.push(message),
            Err(e) => debug!("Dropping unrecognized page message {value}: {e}"),
        }
    }
    Ok(messages)
}

/// Forward a summarize request to the injector worker.
///
/// Fire-and-forget: a full or closed channel is logged and dropped, never
/// surfaced back to the page.
pub fn relay_summarize(tx: &mpsc::Sender<SummarizeRequest>, transcript: String) {
    if let Err(e) = tx.try_send(SummarizeRequest { transcript }) {
        warn!("Summarize request dropped: {e}");
    }
}

/// Assemble the full prompt sent to the assistant: the user's prompt
/// template, a blank line, a literal "Transcript:" label, then the text.
#[must_use]
pub fn compose_prompt(prompt_template: &str, transcript: &str) -> String {
    format!("{prompt_template}\n\nTranscript:\n{transcript}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_label_and_blank_line() {
        assert_eq!(
            compose_prompt("Summarize this.", "line one\nline two"),
            "Summarize this.\n\nTranscript:\nline one\nline two"
        );
    }

    #[test]
    fn wire_shape_round_trips() {
        let msg: PageMessage =
            serde_json::from_str(r#"{"type":"summarize","transcript":"Hello"}"#).unwrap();
        assert_eq!(
            msg,
            PageMessage::Summarize {
                transcript: "Hello".to_string()
            }
        );

        let msg: PageMessage =
            serde_json::from_str(r#"{"type":"set_language","language":"ar"}"#).unwrap();
        assert_eq!(
            msg,
            PageMessage::SetLanguage {
                language: "ar".to_string()
            }
        );
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        assert!(serde_json::from_str::<PageMessage>(r#"{"type":"ping"}"#).is_err());
    }
}
