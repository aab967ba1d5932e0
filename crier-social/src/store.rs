//! Maps platforms to their persistent on-disk session state.
//!
//! Profile directories are created on first use and persist indefinitely;
//! nothing here ever deletes one. Two processes resolving the same platform
//! for the same OS user get the same directory, which is exactly how
//! authentication survives across invocations.

use crier_common::{BrowserProfile, CrierError, Platform, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the profile directory for `platform`, creating it if absent.
    ///
    /// Deterministic for a given platform and OS user; the only failure mode
    /// is a filesystem error, which is fatal for the invocation.
    pub fn resolve(&self, platform: Platform) -> Result<BrowserProfile> {
        let dir = self
            .root
            .join("browser_profiles")
            .join(format!("{}_profile", platform.slug()));
        std::fs::create_dir_all(&dir).map_err(|e| CrierError::Storage {
            path: dir.clone(),
            source: e,
        })?;
        Ok(BrowserProfile::new(dir))
    }

    /// Per-OS-user profile variant (`<engine>_<os>_<user>`) for deployments
    /// that share one profile across platforms instead of splitting per
    /// platform.
    pub fn shared_profile(&self, engine: &str) -> Result<BrowserProfile> {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "user".into());
        let dir = self
            .root
            .join("browser_profiles")
            .join(format!("{engine}_{}_{user}", std::env::consts::OS));
        std::fs::create_dir_all(&dir).map_err(|e| CrierError::Storage {
            path: dir.clone(),
            source: e,
        })?;
        Ok(BrowserProfile::new(dir))
    }

    /// Where the manual login flow drops its cookie/local-storage snapshot.
    pub fn snapshot_path(&self, platform: Platform) -> PathBuf {
        self.root
            .join("sessions")
            .join(format!("{}_session.json", platform.slug()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());

        let first = store.resolve(Platform::X).unwrap();
        let second = store.resolve(Platform::X).unwrap();
        assert_eq!(first, second);
        assert!(first.path().is_dir());
    }

    #[test]
    fn platforms_get_distinct_profiles() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());

        let x = store.resolve(Platform::X).unwrap();
        let ig = store.resolve(Platform::Instagram).unwrap();
        assert_ne!(x, ig);
        assert!(x.path().ends_with("x_profile"));
        assert!(ig.path().ends_with("instagram_profile"));
    }

    #[test]
    fn shared_profile_embeds_engine_os_and_user() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());

        let profile = store.shared_profile("chromium").unwrap();
        let name = profile.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("chromium_"));
        assert!(name.contains(std::env::consts::OS));
    }

    #[test]
    fn snapshot_path_is_per_platform() {
        let store = SessionStore::new("storage");
        assert!(store
            .snapshot_path(Platform::Facebook)
            .ends_with("sessions/facebook_session.json"));
    }
}
