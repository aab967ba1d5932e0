//! Subcommand implementations: input validation, orchestration, and
//! operator-readable progress text. Outcomes print to stdout by design;
//! structured diagnostics go to the tracing sink.

use anyhow::{bail, Result};
use crier_common::{Platform, PostRequest, WorkflowOutcome};
use crier_config::CrierConfig;
use crier_drivers::browser::{LaunchOptions, PageSurface, StealthSession};
use crier_social::platform::PlatformSpec;
use crier_social::snapshot::SessionSnapshot;
use crier_social::{publish, SessionStore};
use std::path::PathBuf;
use tracing::warn;

fn launch_options(config: &CrierConfig, headless: bool) -> LaunchOptions {
    LaunchOptions {
        webdriver_url: config.webdriver_url.clone(),
        headless,
        user_agent: config.user_agent.clone(),
    }
}

pub async fn post(
    config: &CrierConfig,
    platforms: Vec<String>,
    caption: String,
    media: Vec<PathBuf>,
    skip_missing_media: bool,
    headless: bool,
) -> Result<()> {
    if caption.trim().is_empty() {
        bail!("caption cannot be empty");
    }
    for path in &media {
        if !path.is_file() {
            bail!("media file not found: {}", path.display());
        }
    }

    let mut targets = Vec::new();
    for raw in &platforms {
        let platform: Platform = raw.parse()?;
        if !targets.contains(&platform) {
            targets.push(platform);
        }
    }

    let store = SessionStore::new(&config.storage_dir);
    let launch = launch_options(config, headless);

    let mut failures = 0usize;
    for platform in targets {
        println!("posting to {platform}...");
        let request = PostRequest::new(platform, caption.clone(), media.clone());
        match publish(&store, &launch, config.pacing, &request, skip_missing_media).await {
            Ok(WorkflowOutcome::Published) => println!("{platform}: published"),
            Ok(WorkflowOutcome::SkippedNoMedia) => {
                println!("{platform}: skipped, no media provided")
            }
            Ok(WorkflowOutcome::NeedsLogin) => {
                failures += 1;
                println!("{platform}: not logged in");
                println!("  run: crier login -p {platform}");
            }
            Ok(WorkflowOutcome::Failed(reason)) => {
                failures += 1;
                println!("{platform}: failed ({reason})");
            }
            Err(e) => {
                failures += 1;
                eprintln!("{platform}: {e}");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} platform(s) did not publish");
    }
    Ok(())
}

pub async fn login(config: &CrierConfig, platform_arg: &str) -> Result<()> {
    let platform: Platform = platform_arg.parse()?;
    let Some(spec) = PlatformSpec::for_platform(platform) else {
        bail!("login for {platform} is not supported yet");
    };

    let store = SessionStore::new(&config.storage_dir);
    let profile = store.resolve(platform)?;
    // Manual login always gets a visible window.
    let launch = launch_options(config, false);

    println!("launching {platform} login browser...");
    let session = StealthSession::launch(&profile, &launch).await?;
    let mut page = session.page();

    if let Err(e) = page.goto(&spec.home_url).await {
        let _ = session.close().await;
        return Err(e.into());
    }

    println!("log in manually in the opened browser window.");
    println!("once your feed appears and popups are closed, return here and press Enter.");
    wait_for_enter().await?;

    match SessionSnapshot::capture(&session, platform).await {
        Ok(snapshot) => {
            let path = store.snapshot_path(platform);
            match snapshot.save(&path) {
                Ok(()) => println!("session snapshot written to {}", path.display()),
                Err(e) => warn!(error = %e, "could not write session snapshot"),
            }
        }
        Err(e) => warn!(error = %e, "could not capture session snapshot"),
    }

    session.close().await?;
    println!("{platform} session saved; future posts will reuse it.");
    Ok(())
}

async fn wait_for_enter() -> Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(())
}
