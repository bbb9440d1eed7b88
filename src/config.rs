//! Configuration for droidscout
//!
//! Loaded from defaults, an optional `droidscout.toml`, and `DROIDSCOUT_*`
//! environment variables, in that precedence order. The resulting value is
//! passed explicitly into constructors; there is no process-wide state.

use anyhow::{Context as _, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bridge executable name or path (resolved against PATH when bare)
    pub bridge: String,

    /// Device serial to target; `None` lets the bridge pick the only device
    pub serial: Option<String>,

    /// Root directory for downloads and generated reports
    pub output_root: PathBuf,

    /// Upper bound for one bridge invocation, in seconds
    pub timeout_secs: u64,

    /// Default record/file cap for filters and reports
    pub default_limit: usize,

    /// Remote directory the camera auto-report pulls from
    pub camera_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bridge: "adb".to_string(),
            serial: None,
            output_root: PathBuf::from("output"),
            timeout_secs: 120,
            default_limit: 100,
            camera_dir: "/sdcard/DCIM/Camera".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, optionally from an explicit file path
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = path.unwrap_or("droidscout.toml");
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("DROIDSCOUT_"))
            .extract()
            .with_context(|| format!("failed to load configuration from '{}'", file))
    }
}
