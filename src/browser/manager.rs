//! Shared browser instance manager
//!
//! One lazily-launched browser serves the whole process: the watch page and
//! every injection tab. Health is checked on each acquisition via the
//! `version()` CDP call, with automatic relaunch after a crash.

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{BrowserWrapper, launch_browser};

/// Lazily-launching manager for the shared browser instance
#[derive(Clone)]
pub struct BrowserManager {
    browser: Arc<Mutex<Option<BrowserWrapper>>>,
    headless: bool,
}

impl BrowserManager {
    /// Create a manager; the browser is not launched until first use
    #[must_use]
    pub fn new(headless: bool) -> Self {
        Self {
            browser: Arc::new(Mutex::new(None)),
            headless,
        }
    }

    /// Open a new tab, launching or recovering the browser as needed
    pub async fn open_page(&self, url: &str) -> Result<Page> {
        let mut guard = self.browser.lock().await;

        if let Some(wrapper) = guard.as_ref() {
            match wrapper.browser().version().await {
                Ok(_) => debug!("Browser health check passed"),
                Err(e) => {
                    warn!("Browser health check failed: {e}. Relaunching...");
                    if let Some(mut crashed) = guard.take() {
                        let _ = crashed.browser_mut().close().await;
                        let _ = crashed.browser_mut().wait().await;
                        crashed.cleanup_temp_dir();
                    }
                }
            }
        }

        if guard.is_none() {
            info!("Launching browser (first use or after recovery)");
            let (browser, handler, user_data_dir) = launch_browser(self.headless).await?;
            *guard = Some(BrowserWrapper::new(browser, handler, user_data_dir));
        }

        let wrapper = guard
            .as_ref()
            .context("Browser unavailable after launch")?;
        let page = wrapper
            .browser()
            .new_page(url)
            .await
            .with_context(|| format!("Failed to open page {url}"))?;
        Ok(page)
    }

    /// Close the browser if running; safe to call repeatedly
    pub async fn shutdown(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;

        if let Some(mut wrapper) = guard.take() {
            info!("Shutting down browser");
            if let Err(e) = wrapper.browser_mut().close().await {
                warn!("Failed to close browser cleanly: {e}");
            }
            if let Err(e) = wrapper.browser_mut().wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
            wrapper.cleanup_temp_dir();
        }

        Ok(())
    }
}
