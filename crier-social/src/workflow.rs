//! The generic posting workflow engine.
//!
//! A strictly linear state machine: navigate, gate on login state, open the
//! composer, attach media, type the caption, advance through any interposed
//! confirmation screens, submit. There is no branching beyond
//! success/failure at each state and no retry of a whole interaction —
//! retry exists only inside selector resolution, because re-running a
//! possibly part-submitted form risks duplicate posts.
//!
//! Step failures split two ways. Hard: composer or publish control missing
//! kills the post. Soft: a missed media input or caption surface is logged
//! and the run continues, so a missing attachment never throws away a
//! caption the operator already composed (caption misses harden when the
//! spec marks the caption required).

use crate::login::is_authenticated;
use crate::platform::PlatformSpec;
use crier_common::{CrierError, PacingConfig, PostRequest, Result, WorkflowOutcome};
use crier_drivers::browser::behavioral::BehavioralEngine;
use crier_drivers::browser::{resolve, PageSurface, SelectorCandidate};
use tracing::{info, warn};

/// States the engine passed through, in order. Recorded per run for
/// diagnostics; conditional states appear only when their condition held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Navigate,
    AuthGate,
    OpenComposer,
    AttachMedia,
    TypeCaption,
    Advance,
    Submit,
}

pub struct WorkflowEngine {
    spec: PlatformSpec,
    pacing: PacingConfig,
    behavioral: BehavioralEngine,
    trace: Vec<Step>,
}

impl WorkflowEngine {
    pub fn new(spec: PlatformSpec, pacing: PacingConfig) -> Self {
        Self {
            spec,
            pacing,
            behavioral: BehavioralEngine::new(),
            trace: Vec::new(),
        }
    }

    /// Steps recorded by the most recent [`run`](Self::run).
    pub fn trace(&self) -> &[Step] {
        &self.trace
    }

    /// Drive one post to its terminal outcome.
    ///
    /// `skip_on_missing_media` is the operator's decision for platforms
    /// whose spec requires media; it is consumed before the browser touches
    /// anything.
    pub async fn run<P: PageSurface + ?Sized>(
        &mut self,
        page: &mut P,
        request: &PostRequest,
        skip_on_missing_media: bool,
    ) -> Result<WorkflowOutcome> {
        self.trace.clear();

        if request.platform != self.spec.platform {
            return Err(CrierError::Config(format!(
                "request targets {} but engine is configured for {}",
                request.platform, self.spec.platform
            )));
        }

        if self.spec.media_required && request.media.is_empty() {
            return Ok(if skip_on_missing_media {
                info!(target: "social.workflow", platform = %self.spec.platform, "no media; skipping per operator decision");
                WorkflowOutcome::SkippedNoMedia
            } else {
                WorkflowOutcome::Failed("media required".into())
            });
        }

        // Navigate. Document load only; these sites never go network-idle.
        self.trace.push(Step::Navigate);
        page.goto(&self.spec.home_url).await?;
        self.behavioral.pause(self.pacing.settle).await;

        // Authenticate gate. An unauthenticated page makes every later step
        // meaningless, so stop before touching anything.
        self.trace.push(Step::AuthGate);
        if !is_authenticated(page, &self.spec.login).await? {
            return Ok(WorkflowOutcome::NeedsLogin);
        }

        click_if_present(page, &self.spec.interstitials).await?;

        // Open composer.
        self.trace.push(Step::OpenComposer);
        self.behavioral.pause(self.pacing.step).await;
        let composer = match resolve(page, "composer open control", &self.spec.composer).await {
            Ok(handle) => handle,
            Err(CrierError::ElementNotFound(_)) => {
                return Ok(WorkflowOutcome::Failed("composer not found".into()));
            }
            Err(e) => return Err(e),
        };
        page.click(composer).await?;
        click_if_present(page, &self.spec.composer_followups).await?;

        // Attach media. Soft on resolution failure: losing the attachment
        // must not lose the caption.
        if !request.media.is_empty() {
            self.trace.push(Step::AttachMedia);
            self.behavioral.pause(self.pacing.step).await;
            match resolve(page, "media file input", &self.spec.file_input).await {
                Ok(handle) => {
                    page.attach_files(handle, &request.media).await?;
                    info!(
                        target: "social.workflow",
                        count = request.media.len(),
                        "media attached"
                    );
                }
                Err(CrierError::ElementNotFound(_)) => {
                    warn!(
                        target: "social.workflow",
                        "media input not found; continuing without attachments"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        // Type caption, character by character.
        if !request.caption.is_empty() {
            self.trace.push(Step::TypeCaption);
            self.behavioral.pause(self.pacing.step).await;
            match resolve(page, "caption surface", &self.spec.caption).await {
                Ok(handle) => {
                    for ch in request.caption.chars() {
                        page.send_char(handle, ch).await?;
                        self.behavioral.pause(self.pacing.keystroke).await;
                    }
                }
                Err(CrierError::ElementNotFound(_)) if !self.spec.caption_required => {
                    warn!(
                        target: "social.workflow",
                        "caption surface not found; continuing without caption"
                    );
                }
                Err(CrierError::ElementNotFound(_)) => {
                    return Ok(WorkflowOutcome::Failed("caption surface not found".into()));
                }
                Err(e) => return Err(e),
            }
        }

        // Advance through interposed confirmation screens.
        if let Some(advance) = &self.spec.advance {
            for round in 0..advance.clicks {
                self.trace.push(Step::Advance);
                self.behavioral.pause(self.pacing.step).await;
                match resolve(page, "advance control", &advance.candidates).await {
                    Ok(handle) => page.click(handle).await?,
                    Err(CrierError::ElementNotFound(_)) => {
                        warn!(
                            target: "social.workflow",
                            round,
                            "advance control not found; continuing"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        // Submit.
        self.trace.push(Step::Submit);
        self.behavioral.pause(self.pacing.step).await;
        match resolve(page, "publish control", &self.spec.submit).await {
            Ok(handle) => {
                page.click(handle).await?;
                self.behavioral.pause(self.pacing.submit).await;
                info!(target: "social.workflow", platform = %self.spec.platform, "post published");
                Ok(WorkflowOutcome::Published)
            }
            Err(CrierError::ElementNotFound(_)) => {
                Ok(WorkflowOutcome::Failed("publish control not found".into()))
            }
            Err(e) => Err(e),
        }
    }
}

/// Click each candidate that happens to be visible; absence is normal.
async fn click_if_present<P: PageSurface + ?Sized>(
    page: &mut P,
    candidates: &[SelectorCandidate],
) -> Result<()> {
    for candidate in candidates {
        if let Some(handle) = page.find_visible(&candidate.selector, candidate.wait).await? {
            info!(
                target: "social.workflow",
                candidate = %candidate.description,
                "dismissing transient control"
            );
            page.click(handle).await?;
        }
    }
    Ok(())
}
