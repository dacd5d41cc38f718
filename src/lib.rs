pub mod browser;
pub mod injector;
pub mod monitor;
pub mod relay;
pub mod settings;
pub mod sidebar;
pub mod transcript;
pub mod watch;

pub use browser::{BrowserManager, BrowserWrapper, launch_browser};
pub use injector::{
    InjectionOutcome, InjectionPhase, InjectionSession, Platform, PlatformSpec, RetryDelays,
    TargetSurface,
};
pub use monitor::VideoTracker;
pub use relay::{PageMessage, SummarizeRequest, compose_prompt};
pub use settings::Settings;
pub use transcript::{CaptionScan, CaptionTrack, PollPolicy, Transcript, TranscriptEvent};
pub use watch::WatchConfig;
