//! Prompt injection into a target assistant page
//!
//! Given a summarize request, opens a tab at the configured platform's URL,
//! waits for it to load, and drives the locate/inject/submit state machine
//! against it. Everything here is best-effort against externally controlled
//! markup: failures degrade to log lines, never to user-facing errors.

mod js;
mod platform;
mod session;
mod surface;

pub use platform::{Platform, PlatformSpec, RetryDelays};
pub use session::{InjectionOutcome, InjectionPhase, InjectionSession};
pub use surface::{CdpSurface, TargetSurface};

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::browser::BrowserManager;
use crate::relay::{SummarizeRequest, compose_prompt};
use crate::settings::Settings;

/// Run the full injection procedure for one request: open the tab, wait for
/// load, then drive a session, with one whole-procedure retry when the very
/// first page call fails to execute.
///
/// The tab is left open either way; there is no end-to-end success signal to
/// report, so the page itself is the only feedback the user gets.
pub async fn run_injection(
    manager: &BrowserManager,
    spec: &'static PlatformSpec,
    prompt: &str,
    delays: &RetryDelays,
) -> Result<InjectionOutcome> {
    info!(
        platform = spec.platform.id(),
        url = spec.target_url,
        "Opening injection tab"
    );

    // TabOpening: a fresh tab per request, nothing shared across sessions
    let page = manager
        .open_page("about:blank")
        .await
        .context("Failed to open injection tab")?;
    page.goto(spec.target_url)
        .await
        .context("Failed to navigate injection tab")?;

    // AwaitingLoad: one-shot wait scoped to this tab only
    page.wait_for_navigation()
        .await
        .context("Injection tab never finished loading")?;

    for round in 0..2u8 {
        let mut session = InjectionSession::new();
        let mut cdp = CdpSurface::new(&page, spec);
        let outcome = session.run(&mut cdp, spec, delays, prompt).await;

        match outcome {
            InjectionOutcome::ScriptError if round == 0 => {
                warn!(
                    platform = spec.platform.id(),
                    "Page scripting failed, retrying once after delay"
                );
                tokio::time::sleep(Duration::from_millis(delays.script_retry_ms)).await;
            }
            InjectionOutcome::Submitted => {
                info!(platform = spec.platform.id(), "Submit attempted");
                return Ok(outcome);
            }
            InjectionOutcome::Failed { attempts } => {
                warn!(
                    platform = spec.platform.id(),
                    attempts, "Injection gave up without submitting"
                );
                return Ok(outcome);
            }
            InjectionOutcome::ScriptError => break,
        }
    }

    error!(
        platform = spec.platform.id(),
        "Page scripting failed twice, abandoning injection"
    );
    Ok(InjectionOutcome::ScriptError)
}

/// Worker loop servicing summarize requests from the relay channel.
///
/// Settings are re-read per request so the platform choice and prompt
/// template reflect whatever was last saved; a missing or unreadable
/// settings file silently falls back to the defaults.
pub async fn run_relay_worker(manager: BrowserManager, mut rx: mpsc::Receiver<SummarizeRequest>) {
    while let Some(request) = rx.recv().await {
        let settings = Settings::load().unwrap_or_default();
        let spec = Platform::resolve(&settings.selected_platform).spec();
        let prompt = compose_prompt(&settings.custom_prompt, &request.transcript);

        if let Err(e) = run_injection(&manager, spec, &prompt, &RetryDelays::default()).await {
            warn!(
                platform = spec.platform.id(),
                "Injection aborted: {e:#}"
            );
        }
    }
}
