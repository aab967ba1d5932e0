use anyhow::Result;
use clap::{Parser, Subcommand};
use crier_common::observability::{init_logging, LogConfig};
use crier_config::CrierConfigLoader;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "crier",
    version,
    about = "Automate posting to social platforms through a real browser"
)]
struct Cli {
    /// Configuration file; missing files fall back to defaults.
    #[arg(long, default_value = "crier.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish a caption (and optional media) to one or more platforms.
    Post {
        /// Platforms to post to (instagram, x, facebook, ...). Repeatable.
        #[arg(short = 'p', long = "platform", required = true)]
        platforms: Vec<String>,

        /// Caption text; must be non-empty.
        #[arg(short, long)]
        caption: String,

        /// Media file paths to attach. Repeatable.
        #[arg(short, long = "media")]
        media: Vec<PathBuf>,

        /// Skip platforms that require media instead of failing the post.
        #[arg(long)]
        skip_missing_media: bool,

        /// Force a visible browser window for this run.
        #[arg(long, conflicts_with = "headless")]
        headed: bool,

        /// Force a headless run even when the config enables a window.
        #[arg(long)]
        headless: bool,
    },
    /// Open a headed browser so you can log in manually; the session
    /// persists in the platform's profile directory.
    Login {
        /// Platform to log into.
        #[arg(short, long)]
        platform: String,
    },
}

/// CLI flags win over the config file; with neither flag the file decides.
fn headless_mode(config_headless: bool, force_headless: bool, force_headed: bool) -> bool {
    if force_headless {
        true
    } else if force_headed {
        false
    } else {
        config_headless
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CrierConfigLoader::new().with_file(&cli.config).load()?;
    init_logging(LogConfig::default())?;

    match cli.command {
        Command::Post {
            platforms,
            caption,
            media,
            skip_missing_media,
            headed,
            headless,
        } => {
            let headless = headless_mode(config.headless, headless, headed);
            commands::post(&config, platforms, caption, media, skip_missing_media, headless).await
        }
        Command::Login { platform } => commands::login(&config, &platform).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_and_headed_conflict() {
        let result = Cli::try_parse_from([
            "crier", "post", "-p", "x", "-c", "hi", "--headed", "--headless",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_config_in_both_directions() {
        assert!(headless_mode(false, true, false));
        assert!(!headless_mode(true, false, true));
        assert!(headless_mode(true, false, false));
        assert!(!headless_mode(false, false, false));
    }
}
