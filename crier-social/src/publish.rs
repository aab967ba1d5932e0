//! One-shot posting orchestration: launch, run, tear down.

use crate::platform::PlatformSpec;
use crate::store::SessionStore;
use crate::workflow::WorkflowEngine;
use crier_common::{PacingConfig, PostRequest, Result, WorkflowOutcome};
use crier_drivers::browser::{LaunchOptions, StealthSession};
use tracing::info;

/// Publish one request end to end.
///
/// Resolves the platform's profile, launches a stealth session against it,
/// runs the workflow engine, and closes the session on every path — a
/// workflow failure never leaks the browser. Launch and storage errors
/// propagate as fatal; everything the operator can act on comes back as a
/// [`WorkflowOutcome`].
pub async fn publish(
    store: &SessionStore,
    launch: &LaunchOptions,
    pacing: PacingConfig,
    request: &PostRequest,
    skip_on_missing_media: bool,
) -> Result<WorkflowOutcome> {
    let Some(spec) = PlatformSpec::for_platform(request.platform) else {
        return Ok(WorkflowOutcome::Failed(format!(
            "posting to {} is not supported yet",
            request.platform
        )));
    };

    let profile = store.resolve(request.platform)?;
    let session = StealthSession::launch(&profile, launch).await?;
    let mut page = session.page();

    let mut engine = WorkflowEngine::new(spec, pacing);
    let result = engine.run(&mut page, request, skip_on_missing_media).await;

    info!(
        target: "social.workflow",
        platform = %request.platform,
        trace = ?engine.trace(),
        "workflow finished"
    );

    // Teardown runs regardless of how the run ended.
    session.close().await?;

    result
}
