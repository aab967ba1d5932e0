//! The page surface the workflow engine drives.
//!
//! [`PageSurface`] is the seam between workflow logic and the browser: the
//! engine only ever sees opaque [`ElementHandle`]s and bounded-wait queries,
//! which keeps it testable against scripted fakes. [`LivePage`] is the
//! production implementation over a fantoccini WebDriver client.

use crate::browser::behavioral::BehavioralEngine;
use crate::browser::stealth::STEALTH_INIT_SCRIPT;
use anyhow::anyhow;
use async_trait::async_trait;
use crier_common::{CrierError, Result};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use std::path::PathBuf;
use std::time::Duration;

/// One way of locating a UI element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Css(String),
    XPath(String),
}

impl Selector {
    pub fn css(s: impl Into<String>) -> Self {
        Selector::Css(s.into())
    }

    pub fn xpath(s: impl Into<String>) -> Self {
        Selector::XPath(s.into())
    }

    pub fn as_locator(&self) -> Locator<'_> {
        match self {
            Selector::Css(s) => Locator::Css(s),
            Selector::XPath(s) => Locator::XPath(s),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Css(s) => write!(f, "css={s}"),
            Selector::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// Opaque reference to an element previously returned by
/// [`PageSurface::find_visible`]. Valid for the lifetime of the page that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle(pub usize);

/// Object-safe view of one browser page.
///
/// The workflow engine is written against this trait; tests substitute
/// scripted fakes that record every interaction.
#[async_trait]
pub trait PageSurface: Send {
    /// Navigate and wait for the initial document load (not network idle;
    /// social sites keep background connections open indefinitely).
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Current page URL as a string.
    async fn current_url(&mut self) -> Result<String>;

    /// Wait up to `wait` for a visible element matching `selector`.
    /// `Ok(None)` means the bounded wait elapsed without a visible match;
    /// `Err` is reserved for driver-level failures.
    async fn find_visible(
        &mut self,
        selector: &Selector,
        wait: Duration,
    ) -> Result<Option<ElementHandle>>;

    /// Click a previously resolved element.
    async fn click(&mut self, handle: ElementHandle) -> Result<()>;

    /// Send one character to a previously resolved element. The caller owns
    /// inter-key pacing.
    async fn send_char(&mut self, handle: ElementHandle, ch: char) -> Result<()>;

    /// Submit local file paths to a resolved `input[type=file]` element.
    async fn attach_files(&mut self, handle: ElementHandle, paths: &[PathBuf]) -> Result<()>;
}

/// Production [`PageSurface`] over a fantoccini client.
pub struct LivePage {
    client: Client,
    behavioral: BehavioralEngine,
    elements: Vec<Element>,
}

/// Re-check interval while waiting for a present-but-hidden element to
/// become visible.
const VISIBILITY_POLL: Duration = Duration::from_millis(100);

impl LivePage {
    pub fn new(client: Client, behavioral: BehavioralEngine) -> Self {
        Self {
            client,
            behavioral,
            elements: Vec::new(),
        }
    }

    fn element(&self, handle: ElementHandle) -> Result<&Element> {
        self.elements
            .get(handle.0)
            .ok_or_else(|| CrierError::Driver(anyhow!("stale element handle {}", handle.0)))
    }
}

#[async_trait]
impl PageSurface for LivePage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.behavioral.random_delay(300, 1200).await;
        self.client
            .goto(url)
            .await
            .map_err(|e| CrierError::Driver(e.into()))?;

        // No pre-navigation hook over plain WebDriver, so the fingerprint
        // patches go in right after the document loads and before any
        // element interaction.
        self.client
            .execute(STEALTH_INIT_SCRIPT, vec![])
            .await
            .map_err(|e| CrierError::Driver(e.into()))?;

        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(|e| CrierError::Driver(e.into()))
    }

    async fn find_visible(
        &mut self,
        selector: &Selector,
        wait: Duration,
    ) -> Result<Option<ElementHandle>> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }

            let found = self
                .client
                .wait()
                .at_most(remaining)
                .for_element(selector.as_locator())
                .await;

            match found {
                Err(CmdError::WaitTimeout) => return Ok(None),
                Err(e) => return Err(CrierError::Driver(e.into())),
                Ok(element) => {
                    if element.is_displayed().await.unwrap_or(false) {
                        self.elements.push(element);
                        return Ok(Some(ElementHandle(self.elements.len() - 1)));
                    }
                    // Present but hidden; give it a moment to become visible.
                    tokio::time::sleep(VISIBILITY_POLL).await;
                }
            }
        }
    }

    async fn click(&mut self, handle: ElementHandle) -> Result<()> {
        let element = self.element(handle)?.clone();
        // fantoccini's click consumes the element and hands the client back.
        element
            .click()
            .await
            .map(|_| ())
            .map_err(|e| CrierError::Driver(anyhow::Error::from(e)))
    }

    async fn send_char(&mut self, handle: ElementHandle, ch: char) -> Result<()> {
        self.element(handle)?
            .send_keys(&ch.to_string())
            .await
            .map_err(|e| CrierError::Driver(e.into()))
    }

    async fn attach_files(&mut self, handle: ElementHandle, paths: &[PathBuf]) -> Result<()> {
        // WebDriver accepts multiple upload paths as one newline-joined
        // keys payload against the file input.
        let joined = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.element(handle)?
            .send_keys(&joined)
            .await
            .map_err(|e| CrierError::Driver(e.into()))
    }
}
