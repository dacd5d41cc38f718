//! The per-tab injection state machine
//!
//! One session covers one target tab from creation through a submit attempt
//! or exhaustion. Sessions share nothing but the read-only platform table;
//! every wait is a scheduled sleep, and no two states overlap within a
//! session.

use std::time::Duration;

use tracing::{debug, warn};

use super::platform::{PlatformSpec, RetryDelays};
use super::surface::TargetSurface;

/// Where a session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionPhase {
    Idle,
    TabOpening,
    AwaitingLoad,
    Locating,
    Injecting,
    AwaitingSubmitWindow,
    Submitted,
    Failed,
}

/// Terminal result of one session run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// The submit burst was fired
    Submitted,
    /// The locate budget ran out without usable controls
    Failed { attempts: u32 },
    /// The very first page-context call failed to execute (e.g. the tab
    /// navigated away), eligible for one whole-procedure retry
    ScriptError,
}

/// Ephemeral per-tab state: attempt counter plus the submit-once guard
#[derive(Debug)]
pub struct InjectionSession {
    attempts_made: u32,
    submitted: bool,
    phase: InjectionPhase,
}

impl Default for InjectionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectionSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            attempts_made: 0,
            submitted: false,
            phase: InjectionPhase::Idle,
        }
    }

    #[must_use]
    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    #[must_use]
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn phase(&self) -> InjectionPhase {
        self.phase
    }

    /// Drive the session from the load event to a terminal state.
    ///
    /// Call once the target tab has finished loading. Starts with the
    /// platform's settle delay, then runs the bounded locate/inject loop.
    /// The submit burst fires at most once per session, ever: re-running a
    /// session that already submitted returns without touching the page's
    /// submit control again.
    pub async fn run<S: TargetSurface>(
        &mut self,
        surface: &mut S,
        spec: &PlatformSpec,
        delays: &RetryDelays,
        prompt: &str,
    ) -> InjectionOutcome {
        self.phase = InjectionPhase::AwaitingLoad;
        tokio::time::sleep(Duration::from_millis(spec.post_load_delay_ms)).await;
        self.phase = InjectionPhase::Locating;

        loop {
            self.attempts_made += 1;
            debug!(
                platform = spec.platform.id(),
                attempt = self.attempts_made,
                max = spec.max_locate_attempts,
                "Locate attempt"
            );

            match surface.locate_controls().await {
                Ok(true) if !self.submitted => {
                    self.phase = InjectionPhase::Injecting;
                    match surface.inject_text(prompt).await {
                        Ok(true) => return self.finish_submit(surface, spec).await,
                        Ok(false) => {
                            debug!(
                                platform = spec.platform.id(),
                                "Write did not verify, retrying"
                            );
                            if self.out_of_attempts(spec) {
                                return self.fail(spec);
                            }
                            self.phase = InjectionPhase::Locating;
                            tokio::time::sleep(Duration::from_millis(delays.inject_failed_ms))
                                .await;
                        }
                        Err(e) => {
                            if let Some(outcome) = self.on_page_error(spec, &e) {
                                return outcome;
                            }
                            tokio::time::sleep(Duration::from_millis(delays.page_error_ms)).await;
                        }
                    }
                }
                Ok(true) => {
                    // Controls are up but this session already submitted
                    self.phase = InjectionPhase::Submitted;
                    return InjectionOutcome::Submitted;
                }
                Ok(false) => {
                    if self.out_of_attempts(spec) {
                        return self.fail(spec);
                    }
                    tokio::time::sleep(Duration::from_millis(delays.not_found_ms)).await;
                }
                Err(e) => {
                    if let Some(outcome) = self.on_page_error(spec, &e) {
                        return outcome;
                    }
                    tokio::time::sleep(Duration::from_millis(delays.page_error_ms)).await;
                }
            }
        }
    }

    /// Delayed, guarded submit: wait out the platform's settle window, then
    /// fire the burst unless this session already has.
    async fn finish_submit<S: TargetSurface>(
        &mut self,
        surface: &mut S,
        spec: &PlatformSpec,
    ) -> InjectionOutcome {
        self.phase = InjectionPhase::AwaitingSubmitWindow;
        tokio::time::sleep(Duration::from_millis(spec.pre_submit_delay_ms)).await;

        if !self.submitted {
            // Checked-and-set before firing; page context is single-threaded
            // so the flag cannot race
            self.submitted = true;
            if let Err(e) = surface.submit().await {
                warn!(platform = spec.platform.id(), "Submit burst failed: {e}");
            }
        }
        self.phase = InjectionPhase::Submitted;
        InjectionOutcome::Submitted
    }

    fn out_of_attempts(&self, spec: &PlatformSpec) -> bool {
        self.attempts_made >= spec.max_locate_attempts
    }

    fn fail(&mut self, spec: &PlatformSpec) -> InjectionOutcome {
        self.phase = InjectionPhase::Failed;
        warn!(
            platform = spec.platform.id(),
            attempts = self.attempts_made,
            "Injection failed: controls never became available"
        );
        InjectionOutcome::Failed {
            attempts: self.attempts_made,
        }
    }

    /// A page-context error on the very first call means the script never
    /// attached (tab navigated away); that aborts this session so the
    /// caller can schedule its one whole-procedure retry. Later errors are
    /// ordinary failed attempts.
    fn on_page_error(
        &mut self,
        spec: &PlatformSpec,
        error: &anyhow::Error,
    ) -> Option<InjectionOutcome> {
        if self.attempts_made == 1 {
            warn!(
                platform = spec.platform.id(),
                "First page call failed to execute: {error:#}"
            );
            self.phase = InjectionPhase::Failed;
            return Some(InjectionOutcome::ScriptError);
        }
        warn!(platform = spec.platform.id(), "Page call failed: {error:#}");
        if self.out_of_attempts(spec) {
            return Some(self.fail(spec));
        }
        None
    }
}
