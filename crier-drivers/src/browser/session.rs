//! Persistent-profile stealth session launcher.
//!
//! A [`StealthSession`] binds one WebDriver session to one browser profile
//! directory. The profile carries cookies and site data across invocations,
//! which is how authentication persists without credentials ever passing
//! through this code. Launch acquires a process-local lock on the profile
//! first; Chrome's own directory lock covers the cross-process case. Either
//! way, a second live session against the same profile fails fast with a
//! launch error rather than corrupting the profile.

use crate::browser::behavioral::BehavioralEngine;
use crate::browser::page::LivePage;
use crate::browser::stealth::{build_launch_arguments, default_user_agent};
use crier_common::{BrowserProfile, CrierError, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::{info, warn};
use webdriver::capabilities::Capabilities;

static ACTIVE_PROFILES: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();

/// RAII guard marking one profile directory as owned by a live session.
#[derive(Debug)]
pub(crate) struct ProfileLock {
    path: PathBuf,
}

impl ProfileLock {
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let registry = ACTIVE_PROFILES.get_or_init(|| Mutex::new(HashSet::new()));
        let mut held = registry.lock().unwrap_or_else(|e| e.into_inner());
        if !held.insert(path.to_path_buf()) {
            return Err(CrierError::Launch(format!(
                "profile {} is already in use by another session",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for ProfileLock {
    fn drop(&mut self) {
        if let Some(registry) = ACTIVE_PROFILES.get() {
            registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&self.path);
        }
    }
}

/// Options for [`StealthSession::launch`].
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// WebDriver endpoint (Chromedriver by default).
    pub webdriver_url: String,
    pub headless: bool,
    /// Overrides the per-OS default user agent when set.
    pub user_agent: Option<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            user_agent: None,
        }
    }
}

/// A live browser session bound to exactly one profile directory.
///
/// Exclusively owned by the caller for the duration of one invocation and
/// closed on every exit path; the profile lock releases via RAII even when
/// `close` is never reached.
pub struct StealthSession {
    client: Client,
    behavioral: BehavioralEngine,
    _lock: ProfileLock,
}

impl StealthSession {
    /// Start the browser engine against `profile`.
    ///
    /// Creates the profile directory if absent (never deletes it), picks a
    /// host-OS-plausible user agent, and connects with the stealth launch
    /// arguments. Any engine-start failure maps to [`CrierError::Launch`]
    /// and is fatal for the invocation. No target-site navigation happens
    /// here; that is the caller's first move on a page.
    pub async fn launch(profile: &BrowserProfile, options: &LaunchOptions) -> Result<Self> {
        let lock = ProfileLock::acquire(profile.path())?;

        std::fs::create_dir_all(profile.path()).map_err(|e| CrierError::Storage {
            path: profile.path().to_path_buf(),
            source: e,
        })?;

        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| default_user_agent().to_string());
        let args = build_launch_arguments(profile.path(), &user_agent, options.headless);

        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(args));

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .map_err(|e| CrierError::Launch(e.to_string()))?;

        info!(
            target: "browser.launch",
            profile = %profile.path().display(),
            headless = options.headless,
            "stealth session started"
        );

        Ok(Self {
            client,
            behavioral: BehavioralEngine::new(),
            _lock: lock,
        })
    }

    /// Open a page wrapper over this session's browsing context.
    pub fn page(&self) -> LivePage {
        LivePage::new(self.client.clone(), self.behavioral.clone())
    }

    /// Capture `document.cookie` and the full localStorage map of the
    /// current page. Consumed only by the manual login flow's snapshot file.
    pub async fn storage_state(&self) -> Result<(String, BTreeMap<String, String>)> {
        let cookies = self
            .client
            .execute("return document.cookie;", vec![])
            .await
            .map_err(|e| CrierError::Driver(e.into()))?
            .as_str()
            .unwrap_or_default()
            .to_string();

        let local = self
            .client
            .execute(
                "const out = {}; \
                 for (let i = 0; i < localStorage.length; i++) { \
                   const k = localStorage.key(i); out[k] = localStorage.getItem(k); \
                 } \
                 return out;",
                vec![],
            )
            .await
            .map_err(|e| CrierError::Driver(e.into()))?;

        let local_storage = match local.as_object() {
            Some(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
                .collect(),
            None => BTreeMap::new(),
        };

        Ok((cookies, local_storage))
    }

    /// Tear down the WebDriver session. The profile lock releases when the
    /// session drops, so this is safe to skip on panic paths, but normal
    /// flows should always reach it.
    pub async fn close(self) -> Result<()> {
        if let Err(e) = self.client.close().await {
            warn!(target: "browser.launch", error = %e, "session close reported an error");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lock_on_same_profile_fails() {
        let dir = PathBuf::from("/tmp/crier-test-profile-lock");
        let first = ProfileLock::acquire(&dir).expect("first acquire");

        let second = ProfileLock::acquire(&dir);
        assert!(matches!(second, Err(CrierError::Launch(_))));

        drop(first);
        let third = ProfileLock::acquire(&dir).expect("acquire after release");
        drop(third);
    }

    #[test]
    fn distinct_profiles_do_not_contend() {
        let a = ProfileLock::acquire(Path::new("/tmp/crier-lock-a")).expect("a");
        let b = ProfileLock::acquire(Path::new("/tmp/crier-lock-b")).expect("b");
        drop(a);
        drop(b);
    }
}
