//! Loader for Crier runtime configuration with YAML + environment overlays.
//!
//! The schema for `crier.yaml` is small: where to find the WebDriver
//! endpoint, whether to run headless, where session storage lives, and the
//! per-step pacing bounds used by the workflow engine. Every field has a
//! default so the file is optional; `CRIER_`-prefixed environment variables
//! (`__` between nested keys) override file values and `${VAR}` placeholders
//! expand recursively.
use config::{Config, ConfigError, Environment, File};
use crier_common::PacingConfig;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Runtime configuration for one Crier invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrierConfig {
    /// WebDriver endpoint the launcher connects to.
    pub webdriver_url: String,
    /// Run the browser without a visible window. The manual login flow
    /// always forces a headed browser regardless of this setting.
    pub headless: bool,
    /// Root directory for browser profiles and session snapshots.
    pub storage_dir: PathBuf,
    /// Explicit user agent; when unset the launcher picks one per host OS.
    pub user_agent: Option<String>,
    /// Human-pacing bounds applied per workflow step.
    pub pacing: PacingConfig,
}

impl Default for CrierConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            storage_dir: PathBuf::from("storage"),
            user_agent: None,
            pacing: PacingConfig::default(),
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct CrierConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for CrierConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CrierConfigLoader {
    /// Start with sensible defaults: `CRIER_` env overrides on top of
    /// whatever files or snippets are attached afterwards.
    ///
    /// ```
    /// use crier_config::CrierConfigLoader;
    ///
    /// let config = CrierConfigLoader::new()
    ///     .with_yaml_str("headless: false")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert!(!config.headless);
    /// assert_eq!(config.webdriver_url, "http://localhost:9515");
    /// ```
    pub fn new() -> Self {
        // `separator` would otherwise double as the prefix separator, and
        // without `try_parsing` env values stay strings and fail to
        // deserialize into bool/number fields.
        let builder = Config::builder().add_source(
            Environment::with_prefix("CRIER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self { builder }
    }

    /// Attach a config file; missing files are tolerated so deployments can
    /// rely purely on defaults and environment variables.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Values pass through a `serde_json::Value` stage first so `${VAR}`
    /// placeholders can be expanded before materialising the typed struct.
    pub fn load(self) -> Result<CrierConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: CrierConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("CRIER_TEST_DIR", Some("/tmp/profiles"), || {
            let mut v = json!("${CRIER_TEST_DIR}/x_profile");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("/tmp/profiles/x_profile"));
        });
    }

    #[test]
    fn expands_in_nested_structures() {
        temp_env::with_vars([("CRIER_HOST", Some("localhost")), ("CRIER_PORT", Some("9515"))], || {
            let mut v = json!({
                "webdriver_url": "http://${CRIER_HOST}:${CRIER_PORT}",
                "pacing": { "notes": ["$CRIER_HOST"] }
            });
            expand_env_in_value(&mut v);
            assert_eq!(v["webdriver_url"], json!("http://localhost:9515"));
            assert_eq!(v["pacing"]["notes"][0], json!("localhost"));
        });
    }

    #[test]
    fn expansion_is_bounded_on_self_reference() {
        temp_env::with_var("LOOP", Some("${LOOP}"), || {
            let mut v = json!("${LOOP}");
            expand_env_in_value(&mut v);
            // Stops at the depth bound instead of spinning forever.
            assert_eq!(v, json!("${LOOP}"));
        });
    }
}
