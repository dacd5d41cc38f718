//! Capability seam between the state machine and the target page
//!
//! The session drives three operations (locate, inject, submit) through
//! [`TargetSurface`], so the retry/guard logic is independent of CDP and
//! testable against a scripted fake.

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::js;
use super::platform::PlatformSpec;

/// One target page's controls, as the state machine sees them
pub trait TargetSurface {
    /// Run one locate pass. Ok(true) when both the input and submit
    /// controls were found and accepted.
    async fn locate_controls(&mut self) -> Result<bool>;

    /// Write the prompt into the input control. Ok(true) when the read-back
    /// verification passed.
    async fn inject_text(&mut self, text: &str) -> Result<bool>;

    /// Fire the redundant submit strategies.
    async fn submit(&mut self) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct LocateReport {
    input: bool,
    submit: bool,
}

/// CDP-backed surface evaluating the injector scripts in a live page
pub struct CdpSurface<'a> {
    page: &'a Page,
    spec: &'static PlatformSpec,
}

impl<'a> CdpSurface<'a> {
    #[must_use]
    pub fn new(page: &'a Page, spec: &'static PlatformSpec) -> Self {
        Self { page, spec }
    }
}

impl TargetSurface for CdpSurface<'_> {
    async fn locate_controls(&mut self) -> Result<bool> {
        let opts = json!({
            "structuralFallback": self.spec.structural_input_fallback,
            "iconHints": self.spec.submit_icon_hints,
        });
        let expr = format!(
            "({})({}, {}, {})",
            js::LOCATE_FN,
            serde_json::to_string(self.spec.input_selectors)?,
            serde_json::to_string(self.spec.submit_selectors)?,
            opts,
        );

        let result = self
            .page
            .evaluate(expr)
            .await
            .context("Locate pass failed to execute in target page")?;
        let raw = result
            .value()
            .and_then(|v| v.as_str())
            .unwrap_or(r#"{"input":false,"submit":false}"#)
            .to_string();
        let report: LocateReport =
            serde_json::from_str(&raw).context("Locate pass returned an unexpected shape")?;

        debug!(
            platform = self.spec.platform.id(),
            input = report.input,
            submit = report.submit,
            "Locate pass"
        );
        Ok(report.input && report.submit)
    }

    async fn inject_text(&mut self, text: &str) -> Result<bool> {
        let expr = format!("({})({})", js::INJECT_FN, serde_json::to_string(text)?);
        let result = self
            .page
            .evaluate(expr)
            .await
            .context("Inject pass failed to execute in target page")?;
        Ok(result.value().and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn submit(&mut self) -> Result<()> {
        let expr = format!("({})()", js::SUBMIT_FN);
        self.page
            .evaluate(expr)
            .await
            .context("Submit burst failed to execute in target page")?;
        Ok(())
    }
}
