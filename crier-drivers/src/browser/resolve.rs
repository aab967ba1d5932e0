//! Ordered selector-candidate resolution.
//!
//! One logical UI target ("the composer open button") carries an ordered
//! list of candidates, most specific first, most generic fallback last. Each
//! candidate gets exactly one bounded wait and is never retried; the worst
//! case for a whole resolution is the sum of the candidates' waits, so keep
//! the lists short.

use crate::browser::page::{ElementHandle, PageSurface, Selector};
use crier_common::{CrierError, Result};
use std::time::Duration;
use tracing::debug;

/// One named strategy for locating a UI element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorCandidate {
    /// Human-readable label for logs and failure messages.
    pub description: String,
    pub selector: Selector,
    /// Bounded wait for this candidate alone.
    pub wait: Duration,
}

impl SelectorCandidate {
    pub fn new(description: impl Into<String>, selector: Selector, wait_ms: u64) -> Self {
        Self {
            description: description.into(),
            selector,
            wait: Duration::from_millis(wait_ms),
        }
    }

    pub fn css(description: impl Into<String>, selector: impl Into<String>, wait_ms: u64) -> Self {
        Self::new(description, Selector::css(selector), wait_ms)
    }

    pub fn xpath(
        description: impl Into<String>,
        selector: impl Into<String>,
        wait_ms: u64,
    ) -> Self {
        Self::new(description, Selector::xpath(selector), wait_ms)
    }
}

/// Try `candidates` strictly in declaration order; the first visible match
/// wins. Exhausting the list yields [`CrierError::ElementNotFound`] naming
/// `target`.
pub async fn resolve<P: PageSurface + ?Sized>(
    page: &mut P,
    target: &str,
    candidates: &[SelectorCandidate],
) -> Result<ElementHandle> {
    for candidate in candidates {
        match page.find_visible(&candidate.selector, candidate.wait).await? {
            Some(handle) => {
                debug!(
                    target: "browser.selector",
                    %target,
                    candidate = %candidate.description,
                    selector = %candidate.selector,
                    "resolved"
                );
                return Ok(handle);
            }
            None => {
                debug!(
                    target: "browser.selector",
                    %target,
                    candidate = %candidate.description,
                    selector = %candidate.selector,
                    "candidate missed its wait, falling back"
                );
            }
        }
    }
    Err(CrierError::ElementNotFound(target.to_string()))
}
