//! Per-platform posting configuration.
//!
//! Everything platform-specific lives in this data: the engine itself has no
//! platform branches. Selector data is best-effort against UIs that change
//! without notice; candidates are ordered most stable first, and every list
//! carries a generic fallback. When a step starts soft-failing in the logs,
//! revisit the corresponding list against the live UI.

use crate::login::LoginMarkers;
use crier_common::Platform;
use crier_drivers::browser::SelectorCandidate;

/// Interposed confirmation screens between composer and final submission.
#[derive(Debug, Clone)]
pub struct AdvanceStep {
    pub candidates: Vec<SelectorCandidate>,
    /// Fixed number of times the advance control is clicked.
    pub clicks: u32,
}

/// Data record driving one platform's posting workflow.
#[derive(Debug, Clone)]
pub struct PlatformSpec {
    pub platform: Platform,
    pub home_url: String,
    pub login: LoginMarkers,
    /// Transient overlays dismissed before opening the composer ("Try
    /// again" and friends); absence is normal.
    pub interstitials: Vec<SelectorCandidate>,
    pub composer: Vec<SelectorCandidate>,
    /// Clicked if present after the composer opens (submenus, upload
    /// surfaces); each is optional.
    pub composer_followups: Vec<SelectorCandidate>,
    pub file_input: Vec<SelectorCandidate>,
    pub caption: Vec<SelectorCandidate>,
    /// Hard-require a caption: resolution failure of the caption surface
    /// fails the whole post instead of degrading to a caption-less one.
    pub caption_required: bool,
    /// Enforced before the browser ever starts, pairing with the operator's
    /// skip-on-missing-media decision.
    pub media_required: bool,
    pub advance: Option<AdvanceStep>,
    pub submit: Vec<SelectorCandidate>,
}

impl PlatformSpec {
    /// `None` for platforms that are declared but have no posting spec yet.
    pub fn for_platform(platform: Platform) -> Option<PlatformSpec> {
        match platform {
            Platform::Instagram => Some(instagram()),
            Platform::X => Some(x()),
            Platform::Facebook => Some(facebook()),
            Platform::TikTok | Platform::LinkedIn => None,
        }
    }
}

fn x() -> PlatformSpec {
    PlatformSpec {
        platform: Platform::X,
        home_url: "https://x.com/home".into(),
        login: LoginMarkers {
            dom: vec![
                SelectorCandidate::xpath(
                    "login flow next button",
                    "//button[.//span[text()='Next']]",
                    3000,
                ),
                SelectorCandidate::css("sign-in panel", "a[data-testid='loginButton']", 1500),
            ],
            url_fragments: vec!["/login".into(), "flow/login".into()],
        },
        interstitials: vec![SelectorCandidate::xpath(
            "try-again overlay",
            "//button[.//span[text()='Try again']]",
            2000,
        )],
        composer: vec![
            SelectorCandidate::css(
                "sidebar post button",
                "a[data-testid='SideNav_NewTweet_Button']",
                5000,
            ),
            SelectorCandidate::xpath(
                "post link by text",
                "//a[@role='link' and .//span[text()='Post']]",
                3000,
            ),
        ],
        composer_followups: vec![],
        file_input: vec![SelectorCandidate::css(
            "file input",
            "input[type='file']",
            4000,
        )],
        caption: vec![
            SelectorCandidate::css(
                "tweet textarea",
                "div[data-testid='tweetTextarea_0']",
                4000,
            ),
            SelectorCandidate::css("generic textbox", "div[role='textbox']", 2000),
        ],
        caption_required: false,
        media_required: false,
        advance: None,
        submit: vec![
            SelectorCandidate::css(
                "enabled tweet button",
                "button[data-testid='tweetButton']:not([disabled])",
                5000,
            ),
            SelectorCandidate::xpath(
                "post button by text",
                "//button[.//span[text()='Post']]",
                3000,
            ),
        ],
    }
}

fn instagram() -> PlatformSpec {
    PlatformSpec {
        platform: Platform::Instagram,
        home_url: "https://www.instagram.com/".into(),
        login: LoginMarkers {
            dom: vec![
                SelectorCandidate::xpath("log-in control", "//div[text()='Log in']", 3000),
                SelectorCandidate::css(
                    "username field",
                    "input[name='username']",
                    1500,
                ),
            ],
            url_fragments: vec!["accounts/login".into()],
        },
        interstitials: vec![],
        composer: vec![
            SelectorCandidate::css(
                "new post icon",
                "svg[aria-label='New post']",
                5000,
            ),
            SelectorCandidate::xpath(
                "new post link",
                "//a[contains(@aria-label, 'New post')]",
                3000,
            ),
        ],
        composer_followups: vec![
            SelectorCandidate::xpath(
                "post submenu entry",
                "//a[.//*[name()='svg' and @aria-label='Post']]",
                2000,
            ),
            SelectorCandidate::xpath(
                "drag-and-drop surface",
                "//div[contains(., 'Drag photos and videos here')]//button",
                2000,
            ),
        ],
        file_input: vec![SelectorCandidate::css(
            "file input",
            "input[type='file']",
            4000,
        )],
        caption: vec![
            SelectorCandidate::css(
                "caption textbox",
                "div[aria-label='Write a caption...']",
                4000,
            ),
            SelectorCandidate::css("generic textbox", "div[role='textbox']", 2000),
        ],
        caption_required: false,
        media_required: true,
        advance: Some(AdvanceStep {
            candidates: vec![
                SelectorCandidate::xpath(
                    "next button",
                    "//div[@role='button' and text()='Next']",
                    3000,
                ),
                SelectorCandidate::xpath("next by text", "//div[text()='Next']", 1500),
            ],
            clicks: 2,
        }),
        submit: vec![
            SelectorCandidate::xpath(
                "share button",
                "//div[@role='button' and text()='Share']",
                5000,
            ),
            SelectorCandidate::xpath("share by text", "//button[text()='Share']", 3000),
        ],
    }
}

fn facebook() -> PlatformSpec {
    PlatformSpec {
        platform: Platform::Facebook,
        home_url: "https://web.facebook.com".into(),
        login: LoginMarkers {
            dom: vec![
                SelectorCandidate::xpath("log-in control", "//div[text()='Log in']", 3000),
                SelectorCandidate::css("email field", "input[name='email']", 1500),
            ],
            url_fragments: vec!["/login".into()],
        },
        interstitials: vec![],
        composer: vec![
            SelectorCandidate::xpath(
                "status composer prompt",
                "//div[@role='button'][contains(., \"What's on your mind\")]",
                5000,
            ),
            SelectorCandidate::css(
                "create post region",
                "div[aria-label='Create a post']",
                3000,
            ),
        ],
        composer_followups: vec![],
        file_input: vec![SelectorCandidate::css(
            "file input",
            "input[type='file']",
            4000,
        )],
        caption: vec![SelectorCandidate::css(
            "post textbox",
            "div[role='textbox']",
            4000,
        )],
        caption_required: false,
        media_required: false,
        advance: Some(AdvanceStep {
            candidates: vec![SelectorCandidate::xpath(
                "next button",
                "//div[@role='button' and text()='Next']",
                2000,
            )],
            clicks: 2,
        }),
        submit: vec![
            SelectorCandidate::css("post button", "div[aria-label='Post']", 5000),
            SelectorCandidate::xpath(
                "post by role",
                "//div[@role='button' and @aria-label='Post']",
                3000,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implemented_platforms_have_specs() {
        for platform in [Platform::Instagram, Platform::X, Platform::Facebook] {
            let spec = PlatformSpec::for_platform(platform).expect("spec exists");
            assert_eq!(spec.platform, platform);
            assert!(!spec.composer.is_empty());
            assert!(!spec.submit.is_empty());
            assert!(!spec.login.dom.is_empty());
        }
    }

    #[test]
    fn declared_platforms_without_specs_return_none() {
        assert!(PlatformSpec::for_platform(Platform::TikTok).is_none());
        assert!(PlatformSpec::for_platform(Platform::LinkedIn).is_none());
    }

    #[test]
    fn only_instagram_requires_media() {
        assert!(PlatformSpec::for_platform(Platform::Instagram)
            .unwrap()
            .media_required);
        assert!(!PlatformSpec::for_platform(Platform::X).unwrap().media_required);
        assert!(!PlatformSpec::for_platform(Platform::Facebook)
            .unwrap()
            .media_required);
    }

    #[test]
    fn resolution_budgets_stay_well_under_a_minute() {
        // Worst case pure waiting on the happy path: every list's summed
        // waits, all steps included.
        for platform in [Platform::Instagram, Platform::X, Platform::Facebook] {
            let spec = PlatformSpec::for_platform(platform).unwrap();
            let sum_ms = |candidates: &[SelectorCandidate]| -> u128 {
                candidates.iter().map(|c| c.wait.as_millis()).sum()
            };
            let mut total = sum_ms(&spec.login.dom)
                + sum_ms(&spec.interstitials)
                + sum_ms(&spec.composer)
                + sum_ms(&spec.composer_followups)
                + sum_ms(&spec.file_input)
                + sum_ms(&spec.caption)
                + sum_ms(&spec.submit);
            if let Some(advance) = &spec.advance {
                total += sum_ms(&advance.candidates) * advance.clicks as u128;
            }
            assert!(total < 45_000, "{platform}: {total}ms of worst-case waiting");
        }
    }
}
