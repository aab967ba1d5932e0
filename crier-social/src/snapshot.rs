//! Serialized cookie/local-storage snapshot of one authenticated session.
//!
//! Written only by the manual login flow; the posting path never reads it.
//! The persistent profile directory is the real session carrier, this file
//! exists for forward compatibility with deployments that cannot keep a
//! profile directory around.

use chrono::{DateTime, Utc};
use crier_common::{CrierError, Platform, Result};
use crier_drivers::browser::StealthSession;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub platform: Platform,
    pub saved_at: DateTime<Utc>,
    /// Raw `document.cookie` string of the landing page.
    pub cookies: String,
    pub local_storage: BTreeMap<String, String>,
}

impl SessionSnapshot {
    /// Capture the current page's storage state from a live session.
    pub async fn capture(session: &StealthSession, platform: Platform) -> Result<Self> {
        let (cookies, local_storage) = session.storage_state().await?;
        Ok(Self {
            platform,
            saved_at: Utc::now(),
            cookies,
            local_storage,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CrierError::Storage {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CrierError::Driver(anyhow::Error::from(e)))?;
        std::fs::write(path, json).map_err(|e| CrierError::Storage {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CrierError::Storage {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&raw).map_err(|e| CrierError::Driver(anyhow::Error::from(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn snapshot_survives_a_save_load_cycle() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sessions").join("x_session.json");

        let snapshot = SessionSnapshot {
            platform: Platform::X,
            saved_at: Utc::now(),
            cookies: "auth_token=abc123; ct0=def".into(),
            local_storage: BTreeMap::from([("device_id".into(), "xyz".into())]),
        };

        snapshot.save(&path).unwrap();
        let loaded = SessionSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn load_of_missing_file_is_a_storage_error() {
        let err = SessionSnapshot::load(Path::new("/nonexistent/sessions/x.json")).unwrap_err();
        assert!(matches!(err, CrierError::Storage { .. }));
    }
}
