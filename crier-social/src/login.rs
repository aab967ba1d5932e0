//! Login-state detection.
//!
//! Each platform declares a small set of markers known to appear only for
//! unauthenticated visitors: DOM candidates with bounded waits, plus URL
//! fragments indicating a redirect into a login flow. Seeing any marker
//! means "not logged in"; seeing none within the waits is treated as
//! authenticated.
//!
//! This is a closed-world approximation and a documented limitation: it is
//! wrong whenever the site ships a new unauthenticated marker we do not know
//! about, or drops one we do. When detection starts misfiring, fix the
//! marker data against the live UI rather than adding guesswork here.

use crier_common::Result;
use crier_drivers::browser::{PageSurface, SelectorCandidate};
use tracing::info;

/// Markers that appear only for unauthenticated visitors.
#[derive(Debug, Clone)]
pub struct LoginMarkers {
    pub dom: Vec<SelectorCandidate>,
    pub url_fragments: Vec<String>,
}

/// Probe a page already navigated to the platform's landing URL.
///
/// Returns `false` as soon as any marker is seen; the caller must then stop
/// with a needs-login outcome instead of touching the page further.
pub async fn is_authenticated<P: PageSurface + ?Sized>(
    page: &mut P,
    markers: &LoginMarkers,
) -> Result<bool> {
    let url = page.current_url().await?;
    if let Some(fragment) = markers.url_fragments.iter().find(|f| url.contains(f.as_str())) {
        info!(target: "social.login", %url, %fragment, "login redirect detected");
        return Ok(false);
    }

    for marker in &markers.dom {
        if page
            .find_visible(&marker.selector, marker.wait)
            .await?
            .is_some()
        {
            info!(
                target: "social.login",
                marker = %marker.description,
                "unauthenticated marker visible"
            );
            return Ok(false);
        }
    }

    Ok(true)
}
