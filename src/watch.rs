//! Host-page orchestration
//!
//! Owns the watch loop: one CDP page on the video site, the sidebar session
//! bound to the current video identifier, the navigation poll, and the relay
//! of summarize requests to the injector worker. Also provides the one-shot
//! summarize and track-listing commands built from the same pieces.

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::browser::BrowserManager;
use crate::injector::{self, Platform, RetryDelays};
use crate::monitor::{DEFAULT_POLL_INTERVAL_MS, VideoTracker, video_id_from_url};
use crate::relay::{self, PageMessage, compose_prompt};
use crate::settings::Settings;
use crate::sidebar::{SidebarSession, join_transcript};
use crate::transcript::{
    CaptionScan, CaptionTrack, PollPolicy, fetch_caption_tracks, load_transcript,
};

/// Configuration for a watch session
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Video page URL to open
    pub url: String,
    /// Preferred transcript language code
    pub language: String,
    /// Run the browser headless (injection tabs included)
    pub headless: bool,
    /// Poll budget for the embedded caption metadata
    pub poll: PollPolicy,
    /// Spacing of the navigation/relay tick, in milliseconds
    pub tick_interval_ms: u64,
}

impl WatchConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            language: "en".to_string(),
            headless: false,
            poll: PollPolicy::default(),
            tick_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// The current video identifier and its sidebar, replaced together
struct HostSession {
    sidebar: SidebarSession,
    tracks: Vec<CaptionTrack>,
}

/// Run the interactive watch session until Ctrl-C.
pub async fn run_watch(config: WatchConfig) -> Result<()> {
    let manager = BrowserManager::new(config.headless);
    let client = http_client()?;

    let page = manager.open_page("about:blank").await?;
    page.goto(&config.url)
        .await
        .with_context(|| format!("Failed to navigate to {}", config.url))?;
    page.wait_for_navigation()
        .await
        .context("Video page never finished loading")?;

    let (tx, rx) = mpsc::channel(8);
    let worker = tokio::spawn(injector::run_relay_worker(manager.clone(), rx));

    let mut tracker = VideoTracker::new();
    let mut host: Option<HostSession> = None;

    // Initial observation seeds the tracker and builds the first sidebar
    if let Some(url) = current_url(&page).await {
        tracker.observe(&url);
        host = try_initialize_sidebar(&page, &client, &config, &url).await;
    }

    info!("Watching for navigation changes and summarize requests");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
            _ = tokio::time::sleep(Duration::from_millis(config.tick_interval_ms)) => {}
        }

        let Some(url) = current_url(&page).await else {
            continue;
        };

        if tracker.observe(&url) {
            info!(url = %url, "Navigation change detected, reloading page context");
            if let Some(session) = host.take() {
                session.sidebar.destroy(&page).await.ok();
            }
            if let Err(e) = page.reload().await {
                warn!("Page reload failed: {e}");
                continue;
            }
            if let Err(e) = page.wait_for_navigation().await {
                warn!("Page never settled after reload: {e}");
            }
            host = try_initialize_sidebar(&page, &client, &config, &url).await;
            continue;
        }

        // Player controls render late; keep nudging the button in
        if let Some(session) = &host {
            session.sidebar.ensure_summarize_button(&page).await.ok();
        }

        for message in relay::drain_page_messages(&page).await.unwrap_or_default() {
            match message {
                PageMessage::Summarize { transcript } => {
                    info!(chars = transcript.len(), "Relaying summarize request");
                    relay::relay_summarize(&tx, transcript);
                }
                PageMessage::SetLanguage { language } => {
                    if let Some(session) = &host {
                        switch_language(&page, &client, session, &language).await;
                    }
                }
            }
        }
    }

    drop(tx);
    worker.abort();
    manager.shutdown().await?;
    Ok(())
}

/// One-shot: extract the transcript and inject the summarize prompt, no
/// sidebar.
pub async fn run_summarize(
    config: WatchConfig,
    platform_override: Option<String>,
) -> Result<()> {
    let manager = BrowserManager::new(config.headless);
    let client = http_client()?;

    let page = open_video_page(&manager, &config.url).await?;
    let scan = fetch_caption_tracks(&page, &config.poll).await;
    let CaptionScan::Found(tracks) = scan else {
        anyhow::bail!("No captions available for this video");
    };
    let transcript = load_transcript(&client, &tracks, &config.language)
        .await
        .context("No transcript available for the requested language")?;

    let texts: Vec<String> = transcript.events.iter().map(|e| e.text()).collect();
    let settings = Settings::load().unwrap_or_default();
    let platform = Platform::resolve(
        platform_override
            .as_deref()
            .unwrap_or(&settings.selected_platform),
    );
    let prompt = compose_prompt(&settings.custom_prompt, &join_transcript(&texts));

    injector::run_injection(&manager, platform.spec(), &prompt, &RetryDelays::default()).await?;

    // The target page is the only feedback there is; hold the browser open
    // until the user is done with it
    info!("Injection attempted; press Ctrl-C to close the browser");
    tokio::signal::ctrl_c().await.ok();
    manager.shutdown().await
}

/// One-shot: list the available caption tracks for a video.
pub async fn run_tracks(config: WatchConfig) -> Result<()> {
    let manager = BrowserManager::new(config.headless);
    let page = open_video_page(&manager, &config.url).await?;

    match fetch_caption_tracks(&page, &config.poll).await {
        CaptionScan::Absent => println!("No captions available."),
        CaptionScan::Found(tracks) => {
            for track in tracks {
                println!("{}\t{}", track.language_code, track.display_name);
            }
        }
    }

    manager.shutdown().await
}

async fn open_video_page(manager: &BrowserManager, url: &str) -> Result<Page> {
    let page = manager.open_page("about:blank").await?;
    page.goto(url)
        .await
        .with_context(|| format!("Failed to navigate to {url}"))?;
    page.wait_for_navigation()
        .await
        .context("Video page never finished loading")?;
    Ok(page)
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")
}

async fn current_url(page: &Page) -> Option<String> {
    page.url().await.ok().flatten()
}

/// Sidebar setup that degrades to "no sidebar this tick" on failure;
/// a half-loaded page is retried on the next navigation change, never fatal
async fn try_initialize_sidebar(
    page: &Page,
    client: &reqwest::Client,
    config: &WatchConfig,
    url: &str,
) -> Option<HostSession> {
    match initialize_sidebar(page, client, config, url).await {
        Ok(host) => host,
        Err(e) => {
            warn!("Sidebar initialization failed: {e:#}");
            None
        }
    }
}

/// Build the sidebar for the page's current video, if there is one.
///
/// No video identifier means no sidebar; the previous session (if any) was
/// already dropped by the caller.
async fn initialize_sidebar(
    page: &Page,
    client: &reqwest::Client,
    config: &WatchConfig,
    url: &str,
) -> Result<Option<HostSession>> {
    let Some(video_id) = video_id_from_url(url) else {
        return Ok(None);
    };

    let sidebar = SidebarSession::install(page, &video_id).await?;

    let scan = fetch_caption_tracks(page, &config.poll).await;
    match scan {
        CaptionScan::Absent => {
            sidebar.show_tracks(page, &[], "").await.ok();
            sidebar.render_empty(page, "No Captions").await?;
            Ok(Some(HostSession {
                sidebar,
                tracks: Vec::new(),
            }))
        }
        CaptionScan::Found(tracks) => {
            match load_transcript(client, &tracks, &config.language).await {
                Some(transcript) => {
                    sidebar
                        .show_tracks(page, &tracks, &transcript.language)
                        .await?;
                    sidebar.render(page, &transcript).await?;
                }
                None => {
                    sidebar.show_tracks(page, &tracks, "").await?;
                    sidebar.render_empty(page, "Failed to load").await?;
                }
            }
            Ok(Some(HostSession { sidebar, tracks }))
        }
    }
}

/// Re-fetch and render the transcript for a newly selected language
async fn switch_language(
    page: &Page,
    client: &reqwest::Client,
    session: &HostSession,
    language: &str,
) {
    match load_transcript(client, &session.tracks, language).await {
        Some(transcript) => {
            if let Err(e) = session.sidebar.render(page, &transcript).await {
                warn!("Failed to render transcript after language switch: {e:#}");
            }
        }
        None => {
            if let Err(e) = session.sidebar.render_empty(page, "Failed to load").await {
                warn!("Failed to render empty state after language switch: {e:#}");
            }
        }
    }
}
