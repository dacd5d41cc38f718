//! State-machine tests for the injection session, driven against a scripted
//! surface so no browser is involved. Timer waits run under paused time.

use anyhow::Result;
use tubescribe::injector::{
    InjectionOutcome, InjectionPhase, InjectionSession, Platform, PlatformSpec, RetryDelays,
    TargetSurface,
};

#[derive(Clone, Copy)]
enum LocateStep {
    Found,
    Missing,
    Error,
}

/// Surface whose locate behavior follows a scripted sequence (the last step
/// repeats) and whose inject verification is fixed.
struct FakeSurface {
    steps: Vec<LocateStep>,
    inject_ok: bool,
    locate_calls: u32,
    inject_calls: u32,
    submit_calls: u32,
}

impl FakeSurface {
    fn new(steps: Vec<LocateStep>, inject_ok: bool) -> Self {
        Self {
            steps,
            inject_ok,
            locate_calls: 0,
            inject_calls: 0,
            submit_calls: 0,
        }
    }
}

impl TargetSurface for FakeSurface {
    async fn locate_controls(&mut self) -> Result<bool> {
        self.locate_calls += 1;
        let index = (self.locate_calls - 1) as usize;
        let step = self
            .steps
            .get(index)
            .or(self.steps.last())
            .copied()
            .unwrap_or(LocateStep::Missing);
        match step {
            LocateStep::Found => Ok(true),
            LocateStep::Missing => Ok(false),
            LocateStep::Error => anyhow::bail!("target page went away"),
        }
    }

    async fn inject_text(&mut self, _text: &str) -> Result<bool> {
        self.inject_calls += 1;
        Ok(self.inject_ok)
    }

    async fn submit(&mut self) -> Result<()> {
        self.submit_calls += 1;
        Ok(())
    }
}

fn test_spec(max_locate_attempts: u32) -> PlatformSpec {
    PlatformSpec {
        platform: Platform::ChatGpt,
        target_url: "https://assistant.test/",
        post_load_delay_ms: 100,
        pre_submit_delay_ms: 50,
        max_locate_attempts,
        input_selectors: &["textarea"],
        submit_selectors: &["button"],
        submit_icon_hints: &[],
        structural_input_fallback: false,
    }
}

#[tokio::test(start_paused = true)]
async fn exhausts_exactly_the_attempt_budget() {
    let spec = test_spec(7);
    let mut surface = FakeSurface::new(vec![LocateStep::Missing], false);
    let mut session = InjectionSession::new();

    let outcome = session
        .run(&mut surface, &spec, &RetryDelays::default(), "prompt")
        .await;

    assert_eq!(outcome, InjectionOutcome::Failed { attempts: 7 });
    assert_eq!(surface.locate_calls, 7);
    assert_eq!(surface.submit_calls, 0);
    assert_eq!(session.phase(), InjectionPhase::Failed);
    assert!(!session.submitted());
}

#[tokio::test(start_paused = true)]
async fn submits_once_after_controls_appear() {
    let spec = test_spec(10);
    let mut surface = FakeSurface::new(
        vec![LocateStep::Missing, LocateStep::Missing, LocateStep::Found],
        true,
    );
    let mut session = InjectionSession::new();

    let outcome = session
        .run(&mut surface, &spec, &RetryDelays::default(), "prompt")
        .await;

    assert_eq!(outcome, InjectionOutcome::Submitted);
    assert_eq!(surface.locate_calls, 3);
    assert_eq!(surface.inject_calls, 1);
    assert_eq!(surface.submit_calls, 1);
    assert_eq!(session.attempts_made(), 3);
    assert_eq!(session.phase(), InjectionPhase::Submitted);
    assert!(session.submitted());
}

#[tokio::test(start_paused = true)]
async fn rerunning_a_submitted_session_never_resubmits() {
    let spec = test_spec(10);
    let mut surface = FakeSurface::new(vec![LocateStep::Found], true);
    let mut session = InjectionSession::new();

    let first = session
        .run(&mut surface, &spec, &RetryDelays::default(), "prompt")
        .await;
    assert_eq!(first, InjectionOutcome::Submitted);
    assert_eq!(surface.submit_calls, 1);

    let second = session
        .run(&mut surface, &spec, &RetryDelays::default(), "prompt")
        .await;
    assert_eq!(second, InjectionOutcome::Submitted);
    assert_eq!(surface.submit_calls, 1);
    assert_eq!(surface.inject_calls, 1);
}

#[tokio::test(start_paused = true)]
async fn unverified_writes_retry_until_the_budget_runs_out() {
    let spec = test_spec(3);
    let mut surface = FakeSurface::new(vec![LocateStep::Found], false);
    let mut session = InjectionSession::new();

    let outcome = session
        .run(&mut surface, &spec, &RetryDelays::default(), "prompt")
        .await;

    assert_eq!(outcome, InjectionOutcome::Failed { attempts: 3 });
    assert_eq!(surface.inject_calls, 3);
    assert_eq!(surface.submit_calls, 0);
}

#[tokio::test(start_paused = true)]
async fn first_call_failure_aborts_for_the_outer_retry() {
    let spec = test_spec(10);
    let mut surface = FakeSurface::new(vec![LocateStep::Error, LocateStep::Found], true);
    let mut session = InjectionSession::new();

    let outcome = session
        .run(&mut surface, &spec, &RetryDelays::default(), "prompt")
        .await;

    assert_eq!(outcome, InjectionOutcome::ScriptError);
    assert_eq!(surface.locate_calls, 1);
    assert_eq!(surface.submit_calls, 0);
    assert_eq!(session.phase(), InjectionPhase::Failed);
}

#[tokio::test(start_paused = true)]
async fn later_errors_consume_attempts_instead_of_aborting() {
    let spec = test_spec(4);
    let mut surface = FakeSurface::new(vec![LocateStep::Missing, LocateStep::Error], false);
    let mut session = InjectionSession::new();

    let outcome = session
        .run(&mut surface, &spec, &RetryDelays::default(), "prompt")
        .await;

    assert_eq!(outcome, InjectionOutcome::Failed { attempts: 4 });
    assert_eq!(surface.locate_calls, 4);
    assert_eq!(surface.submit_calls, 0);
}
