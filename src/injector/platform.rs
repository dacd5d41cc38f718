//! Per-platform configuration for the target assistant pages
//!
//! Everything platform-specific is data: the target URL, the timing
//! constants, and the ordered selector cascades the locator walks. The state
//! machine itself is shared. All delay and attempt values are opaque tuning
//! constants carried from observed behavior of each platform's UI; they
//! encode no documented rationale and should not be "corrected".

/// Supported assistant platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    ChatGpt,
    Gemini,
    Claude,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::ChatGpt, Platform::Gemini, Platform::Claude];

    /// Resolve a stored platform identifier.
    ///
    /// Unknown or stale identifiers fall back silently to the baseline
    /// platform rather than failing the relay.
    #[must_use]
    pub fn resolve(id: &str) -> Self {
        match id {
            "gemini" => Self::Gemini,
            "claude" => Self::Claude,
            _ => Self::ChatGpt,
        }
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::ChatGpt => "chatgpt",
            Self::Gemini => "gemini",
            Self::Claude => "claude",
        }
    }

    /// Static configuration record for this platform
    #[must_use]
    pub fn spec(&self) -> &'static PlatformSpec {
        match self {
            Self::ChatGpt => &CHATGPT_SPEC,
            Self::Gemini => &GEMINI_SPEC,
            Self::Claude => &CLAUDE_SPEC,
        }
    }
}

/// Immutable per-platform configuration, one entry per supported platform
#[derive(Debug)]
pub struct PlatformSpec {
    pub platform: Platform,

    /// Where the injection tab is opened
    pub target_url: &'static str,

    /// Settle delay after the load event, for client-side rendering that
    /// continues past it
    pub post_load_delay_ms: u64,

    /// Delay between a verified write and the submit attempt, so reactive
    /// validation ("enable submit once non-empty") can settle
    pub pre_submit_delay_ms: u64,

    /// Locate-loop attempt budget
    pub max_locate_attempts: u32,

    /// Input control selectors, most specific first
    pub input_selectors: &'static [&'static str],

    /// Submit control selectors, most specific first
    pub submit_selectors: &'static [&'static str],

    /// Substrings matched against button SVG markup when no submit selector
    /// hits; empty disables the icon scan
    pub submit_icon_hints: &'static [&'static str],

    /// Walk forms and large textareas when the input cascade misses
    pub structural_input_fallback: bool,
}

/// Inter-attempt delays for the locate/inject loop and the one bounded
/// retry of the whole procedure. Opaque tuning values.
#[derive(Debug, Clone, Copy)]
pub struct RetryDelays {
    /// Controls not found yet
    pub not_found_ms: u64,
    /// Controls found but the write did not verify
    pub inject_failed_ms: u64,
    /// A locate/inject pass threw in page context
    pub page_error_ms: u64,
    /// Re-running the whole procedure after the first pass failed to execute
    pub script_retry_ms: u64,
}

impl Default for RetryDelays {
    fn default() -> Self {
        Self {
            not_found_ms: 1000,
            inject_failed_ms: 1200,
            page_error_ms: 1500,
            script_retry_ms: 4000,
        }
    }
}

static CHATGPT_SPEC: PlatformSpec = PlatformSpec {
    platform: Platform::ChatGpt,
    target_url: "https://chat.openai.com/",
    post_load_delay_ms: 6000,
    pre_submit_delay_ms: 1500,
    max_locate_attempts: 25,
    input_selectors: &[
        "textarea[data-id=\"root\"]",
        "textarea[placeholder*=\"Message ChatGPT\"]",
        "textarea[placeholder*=\"Message\"]",
        "textarea[id*=\"prompt-textarea\"]",
        "#prompt-textarea",
        "div[contenteditable=\"true\"][data-id=\"root\"]",
        "div[contenteditable=\"true\"][role=\"textbox\"]",
        "textarea[rows]",
        "main textarea",
        "form textarea",
        "[data-testid=\"composer-text-input\"] textarea",
        "div[contenteditable=\"true\"]",
    ],
    submit_selectors: &[
        "button[data-testid=\"send-button\"]",
        "button[data-testid=\"composer-send-button\"]",
        "button[aria-label=\"Send message\"]",
        "button[aria-label*=\"Send\"]",
        "form button[type=\"submit\"]",
    ],
    submit_icon_hints: &["arrow", "paper-airplane", "send", "m2 2l"],
    structural_input_fallback: true,
};

static GEMINI_SPEC: PlatformSpec = PlatformSpec {
    platform: Platform::Gemini,
    target_url: "https://gemini.google.com/app",
    post_load_delay_ms: 4000,
    pre_submit_delay_ms: 1500,
    max_locate_attempts: 12,
    input_selectors: &[
        "div[contenteditable=\"true\"][data-initial-value]",
        "div[contenteditable=\"true\"][role=\"textbox\"]",
        ".ql-editor",
        "div[contenteditable=\"true\"]",
    ],
    submit_selectors: &[
        "button[aria-label*=\"Send\"]",
        "button.send-button",
    ],
    submit_icon_hints: &[],
    structural_input_fallback: false,
};

static CLAUDE_SPEC: PlatformSpec = PlatformSpec {
    platform: Platform::Claude,
    target_url: "https://claude.ai/chat",
    post_load_delay_ms: 4000,
    pre_submit_delay_ms: 800,
    max_locate_attempts: 18,
    input_selectors: &[
        ".ProseMirror",
        "div[contenteditable=\"true\"][data-placeholder]",
        "fieldset div[contenteditable=\"true\"]",
        "[data-testid=\"chat-input\"]",
        "div[contenteditable=\"true\"]",
    ],
    submit_selectors: &[
        "button[aria-label=\"Send Message\"]",
        "button[aria-label*=\"Send\"]",
        "button[data-testid=\"send-button\"]",
        "button[type=\"submit\"]",
        "form button",
    ],
    submit_icon_hints: &[],
    structural_input_fallback: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_identifier_falls_back_to_baseline() {
        assert_eq!(Platform::resolve("chatgpt"), Platform::ChatGpt);
        assert_eq!(Platform::resolve("claude"), Platform::Claude);
        assert_eq!(Platform::resolve("gemini"), Platform::Gemini);
        assert_eq!(Platform::resolve("totally-new"), Platform::ChatGpt);
        assert_eq!(Platform::resolve(""), Platform::ChatGpt);
    }

    #[test]
    fn table_carries_the_tuned_constants() {
        let chatgpt = Platform::ChatGpt.spec();
        assert_eq!(chatgpt.post_load_delay_ms, 6000);
        assert_eq!(chatgpt.max_locate_attempts, 25);

        let claude = Platform::Claude.spec();
        assert_eq!(claude.pre_submit_delay_ms, 800);
        assert_eq!(claude.max_locate_attempts, 18);

        let gemini = Platform::Gemini.spec();
        assert_eq!(gemini.max_locate_attempts, 12);
    }

    #[test]
    fn every_platform_has_selector_cascades() {
        for platform in Platform::ALL {
            let spec = platform.spec();
            assert!(!spec.input_selectors.is_empty());
            assert!(!spec.submit_selectors.is_empty());
            assert_eq!(spec.platform, platform);
        }
    }
}
