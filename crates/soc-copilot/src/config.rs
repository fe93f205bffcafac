//! Dashboard configuration.
//!
//! Settings are read from TOML. Every field is optional:
//!
//! ```toml
//! [animation]
//! enabled = true
//! duration_ms = 1500
//! decimals = 0
//! easing = "ease-out-cubic"
//!
//! [api]
//! base_path = "/api"
//! ```
//!
//! ```
//! use soc_copilot::config::DashboardConfig;
//!
//! let config = DashboardConfig::from_toml_str("[animation]\nenabled = false\n")?;
//! assert!(!config.animation.enabled);
//! assert_eq!(config.api.base_path, "/api");
//! # Ok::<(), soc_copilot::Error>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use soc_copilot_core::{CountUpConfig, DEFAULT_DURATION_MS, Easing};

use crate::error::{Error, Result};

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Count-up animation defaults.
    pub animation: AnimationSettings,
    /// Backend API location.
    pub api: ApiSettings,
}

/// Defaults applied to every counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationSettings {
    /// Global switch. When false every counter shows its end value at once.
    pub enabled: bool,
    /// Duration for counters that do not set their own, in milliseconds.
    pub duration_ms: f64,
    /// Decimal places for counters that do not set their own.
    pub decimals: i32,
    /// Progress curve.
    pub easing: Easing,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: DEFAULT_DURATION_MS,
            decimals: 0,
            easing: Easing::EaseOutCubic,
        }
    }
}

impl AnimationSettings {
    /// A counter config for `start -> end` using these defaults.
    pub fn counter(&self, start: f64, end: f64) -> CountUpConfig {
        CountUpConfig::new(start, end)
            .with_duration_ms(self.duration_ms)
            .with_decimals(self.decimals)
            .with_enabled(self.enabled)
            .with_easing(self.easing)
    }

    /// A counter config with its own duration and decimals. The global
    /// switch and easing still apply.
    pub fn counter_with(&self, start: f64, end: f64, duration_ms: f64, decimals: i32) -> CountUpConfig {
        self.counter(start, end)
            .with_duration_ms(duration_ms)
            .with_decimals(decimals)
    }
}

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    /// Path prefix for every endpoint.
    pub base_path: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_path: "/api".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(target: "soc_copilot::config", path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::invalid_config("config", e.to_string()))
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        let duration = self.animation.duration_ms;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(Error::invalid_config(
                "animation.duration_ms",
                format!("must be a positive number of milliseconds, got {duration}"),
            ));
        }
        if !self.api.base_path.starts_with('/') {
            return Err(Error::invalid_config(
                "api.base_path",
                format!("must start with '/', got {:?}", self.api.base_path),
            ));
        }
        Ok(())
    }
}
