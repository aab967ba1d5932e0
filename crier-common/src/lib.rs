//! Common types and utilities shared across Crier crates.
//!
//! This crate defines the platform identifiers, post requests, workflow
//! outcomes, pacing configuration, and shared error types used throughout the
//! Crier workspace. It is intentionally lightweight and dependency-minimal so
//! that all crates can depend on it without introducing heavy transitive
//! costs.
//!
//! # Overview
//!
//! - [`Platform`]: Enumerated social platforms
//! - [`PostRequest`]: One publication request fed into the workflow engine
//! - [`WorkflowOutcome`]: Terminal result of a posting run
//! - [`PacingConfig`]: Human-pacing bounds applied per workflow step
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`CrierError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use crier_common::Platform;
//!
//! let platform: Platform = "instagram".parse().unwrap();
//! assert_eq!(platform.slug(), "instagram");
//! assert!(Platform::X.slug().len() > 0);
//! ```
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod observability;

/// Social platforms Crier knows about.
///
/// TikTok and LinkedIn are declared so the CLI can name them, but no posting
/// spec exists for them yet; `crier-social` reports them as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    X,
    Facebook,
    TikTok,
    LinkedIn,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::X,
        Platform::Facebook,
        Platform::TikTok,
        Platform::LinkedIn,
    ];

    /// Stable lowercase identifier used for profile directories and CLI flags.
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::X => "x",
            Platform::Facebook => "facebook",
            Platform::TikTok => "tiktok",
            Platform::LinkedIn => "linkedin",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Platform {
    type Err = CrierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "x" | "twitter" => Ok(Platform::X),
            "facebook" | "fb" => Ok(Platform::Facebook),
            "tiktok" => Ok(Platform::TikTok),
            "linkedin" => Ok(Platform::LinkedIn),
            other => Err(CrierError::Config(format!("unknown platform: {other}"))),
        }
    }
}

/// Persistent on-disk browser profile associated with one platform.
///
/// The directory is owned by the browser engine's persistent-context format
/// and treated as opaque here. One profile must never back two live sessions
/// at once; the launcher enforces this with a process-local lock and the
/// engine enforces it across processes with its own directory lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserProfile {
    path: PathBuf,
}

impl BrowserProfile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One publication request, immutable once constructed.
///
/// The CLI layer validates the caption and media paths before this reaches
/// the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub platform: Platform,
    pub caption: String,
    pub media: Vec<PathBuf>,
}

impl PostRequest {
    pub fn new(platform: Platform, caption: impl Into<String>, media: Vec<PathBuf>) -> Self {
        Self {
            platform,
            caption: caption.into(),
            media,
        }
    }
}

/// Terminal result of running a posting workflow against a [`PostRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// The publish control was activated successfully.
    Published,
    /// The platform requires media, none was supplied, and the operator chose
    /// to skip rather than abort.
    SkippedNoMedia,
    /// The saved session is no longer authenticated; the operator must run
    /// the manual login flow for this platform.
    NeedsLogin,
    /// A hard step failure; the payload names the step that failed.
    Failed(String),
}

impl WorkflowOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, WorkflowOutcome::Published)
    }
}

impl std::fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowOutcome::Published => f.write_str("published"),
            WorkflowOutcome::SkippedNoMedia => f.write_str("skipped (no media)"),
            WorkflowOutcome::NeedsLogin => f.write_str("needs login"),
            WorkflowOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Inclusive bounds for one randomized pause, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn zero() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }
}

/// Human-pacing bounds applied by the workflow engine, per step kind rather
/// than per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after initial navigation while the page settles.
    pub settle: DelayRange,
    /// Pause before each UI interaction.
    pub step: DelayRange,
    /// Pause between individual caption characters.
    pub keystroke: DelayRange,
    /// Pause after activating the final publish control.
    pub submit: DelayRange,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            settle: DelayRange::new(2000, 4000),
            step: DelayRange::new(800, 2200),
            keystroke: DelayRange::new(40, 120),
            submit: DelayRange::new(3000, 6000),
        }
    }
}

impl PacingConfig {
    /// All pauses collapsed to zero. Used by tests and dry runs where
    /// human-like cadence is irrelevant.
    pub const fn instant() -> Self {
        Self {
            settle: DelayRange::zero(),
            step: DelayRange::zero(),
            keystroke: DelayRange::zero(),
            submit: DelayRange::zero(),
        }
    }
}

/// Error types used across the Crier system.
#[derive(thiserror::Error, Debug)]
pub enum CrierError {
    /// The browser engine could not be started, typically lock contention on
    /// the profile directory or a missing WebDriver endpoint. Fatal for the
    /// invocation; never retried.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Filesystem failure while resolving or writing session storage. Fatal.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every selector candidate for one logical UI target timed out.
    /// Local to one workflow step; the engine decides whether it is soft.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A WebDriver command failed for a reason other than a missed wait.
    #[error("driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`CrierError`].
pub type Result<T> = std::result::Result<T, CrierError>;
