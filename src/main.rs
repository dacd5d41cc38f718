use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tubescribe::settings::Settings;
use tubescribe::watch::{WatchConfig, run_summarize, run_tracks, run_watch};

#[derive(Parser)]
#[command(
    name = "tubescribe",
    about = "Caption sidebar and AI-summarize relay for video pages",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a video page with the transcript sidebar and summarize relay
    Watch {
        /// Video page URL
        url: String,

        /// Preferred transcript language code
        #[arg(long, default_value = "en")]
        language: String,

        /// Run the browser headless
        #[arg(long)]
        headless: bool,
    },

    /// Extract the transcript and inject a summarize prompt, no sidebar
    Summarize {
        /// Video page URL
        url: String,

        /// Target platform, overriding the saved setting
        #[arg(long)]
        platform: Option<String>,

        /// Preferred transcript language code
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// List available caption tracks for a video
    Tracks {
        /// Video page URL
        url: String,
    },

    /// Show or change the persisted settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,

    /// Save new settings values
    Set {
        /// Target platform identifier (chatgpt, gemini, claude)
        #[arg(long)]
        platform: Option<String>,

        /// Prompt template placed before the transcript
        #[arg(long)]
        prompt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Watch {
            url,
            language,
            headless,
        } => {
            let mut config = WatchConfig::new(url);
            config.language = language;
            config.headless = headless;
            run_watch(config).await
        }
        Command::Summarize {
            url,
            platform,
            language,
        } => {
            let mut config = WatchConfig::new(url);
            config.language = language;
            run_summarize(config, platform).await
        }
        Command::Tracks { url } => {
            let mut config = WatchConfig::new(url);
            config.headless = true;
            run_tracks(config).await
        }
        Command::Settings { action } => match action {
            SettingsAction::Show => {
                let settings = Settings::load()?;
                println!("platform: {}", settings.selected_platform);
                println!("prompt:   {}", settings.custom_prompt);
                Ok(())
            }
            SettingsAction::Set { platform, prompt } => {
                let mut settings = Settings::load()?;
                if let Some(platform) = platform {
                    settings.selected_platform = platform;
                }
                if let Some(prompt) = prompt {
                    settings.custom_prompt = prompt;
                }
                settings.save()?;
                println!("Settings saved.");
                Ok(())
            }
        },
    }
}
