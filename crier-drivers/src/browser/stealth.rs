//! Launch arguments and JS patches that reduce automation signals.
//!
//! The patch set is fixed and platform-independent: each override targets a
//! disjoint browser property, so injection order does not matter. None of
//! this is a guarantee against detection; it covers the checks commonly
//! probed by social sites.

use std::path::Path;

/// Injected after every navigation. WebDriver exposes no pre-navigation
/// hook, so [`super::page::LivePage::goto`] runs this immediately after the
/// document loads, before any workflow interaction touches the page.
pub const STEALTH_INIT_SCRIPT: &str = r#"
// 1) navigator.webdriver
Object.defineProperty(navigator, 'webdriver', { get: () => false });

// 2) plausible language list
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });

// 3) non-empty plugin list
if (!navigator.plugins || navigator.plugins.length === 0) {
  Object.defineProperty(navigator, 'plugins', {
    get: () => [{ name: 'Chrome PDF Plugin' }, { name: 'Chrome PDF Viewer' }]
  });
}

// 4) permissions.query override for notifications
const origPermissionsQuery = navigator.permissions && navigator.permissions.query;
if (origPermissionsQuery) {
  navigator.permissions.query = (params) => {
    if (params && params.name === 'notifications') {
      return Promise.resolve({ state: Notification.permission });
    }
    return origPermissionsQuery(params);
  };
}

// 5) window.chrome shim
window.chrome = window.chrome || { runtime: {} };
if (window.chrome.runtime && !window.chrome.runtime.toString) {
  window.chrome.runtime.toString = function () { return '[object ChromeRuntime]'; };
}

// 6) hardwareConcurrency and deviceMemory backfill
if (!navigator.hardwareConcurrency) {
  Object.defineProperty(navigator, 'hardwareConcurrency', { get: () => 8 });
}
if (!navigator.deviceMemory) {
  Object.defineProperty(navigator, 'deviceMemory', { get: () => 8 });
}
"#;

/// Default user agent keyed on the host OS, not the target platform.
pub fn default_user_agent() -> &'static str {
    if cfg!(target_os = "macos") {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
    } else if cfg!(target_os = "linux") {
        "Mozilla/5.0 (X11; Linux x86_64) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
    } else {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
    }
}

/// Construct the Chrome command-line arguments for one persistent session.
///
/// The set is deliberately small: enough to mask the automation banner and
/// run on constrained Linux hosts, nothing exotic.
pub fn build_launch_arguments(profile_dir: &Path, user_agent: &str, headless: bool) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--disable-features=site-per-process".to_string(),
        format!("--user-data-dir={}", profile_dir.display()),
        format!("--user-agent={user_agent}"),
        "--window-size=1280,800".to_string(),
    ];

    // Container-friendly tweaks; Chrome refuses to start in most CI/headless
    // Linux environments without these.
    if cfg!(target_os = "linux") {
        args.push("--no-sandbox".to_string());
        args.push("--disable-dev-shm-usage".to_string());
    }

    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn arguments_carry_profile_and_agent() {
        let dir = PathBuf::from("/tmp/x_profile");
        let args = build_launch_arguments(&dir, "TestAgent/1.0", false);
        assert!(args.contains(&"--user-data-dir=/tmp/x_profile".to_string()));
        assert!(args.contains(&"--user-agent=TestAgent/1.0".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn headless_adds_flags() {
        let dir = PathBuf::from("/tmp/p");
        let args = build_launch_arguments(&dir, "ua", true);
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--disable-gpu".to_string()));
    }

    #[test]
    fn patch_script_covers_the_fixed_set() {
        for needle in [
            "navigator, 'webdriver'",
            "'languages'",
            "plugins",
            "notifications",
            "window.chrome",
            "hardwareConcurrency",
            "deviceMemory",
        ] {
            assert!(STEALTH_INIT_SCRIPT.contains(needle), "missing patch: {needle}");
        }
    }
}
