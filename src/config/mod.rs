//! Deployment Configuration Module
//!
//! Per-deployment configuration loaded from TOML, replacing hardcoded
//! coefficients and endpoints with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `FLEETWATCH_CONFIG` environment variable (path to TOML file)
//! 2. `fleetwatch.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(FleetConfig::load());
//!
//! // Anywhere in the codebase:
//! let model = &config::get().energy;
//! ```

pub mod defaults;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregation::EnergyModel;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Sections
// ============================================================================

/// Deployment identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetInfo {
    pub name: String,
    pub site: String,
}

impl Default for FleetInfo {
    fn default() -> Self {
        Self {
            name: "unnamed-fleet".to_string(),
            site: String::new(),
        }
    }
}

/// Attention thresholds used by alerting and derived robot predicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Default group alert threshold, percent
    pub group_threshold_percent: f64,
    /// Battery level below which a unit needs attention, percent
    pub low_battery_percent: f64,
    /// Temperature above which a unit needs attention, °C
    pub high_temperature_c: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            group_threshold_percent: defaults::DEFAULT_GROUP_ALERT_THRESHOLD_PERCENT,
            low_battery_percent: defaults::LOW_BATTERY_ATTENTION_PERCENT,
            high_temperature_c: defaults::HIGH_TEMPERATURE_ATTENTION_C,
        }
    }
}

/// External chat-completion API settings. Credentials stay outside the
/// config file: `token_env` names the environment variable holding the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub model: String,
    pub token_env: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://router.huggingface.co/v1/chat/completions".to_string(),
            model: defaults::ADVISOR_DEFAULT_MODEL.to_string(),
            token_env: defaults::ADVISOR_TOKEN_ENV.to_string(),
            max_tokens: defaults::ADVISOR_MAX_TOKENS,
            temperature: defaults::ADVISOR_TEMPERATURE,
            timeout_secs: defaults::ADVISOR_HTTP_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a fleet deployment.
///
/// Load with `FleetConfig::load()` which searches:
/// 1. `$FLEETWATCH_CONFIG` env var
/// 2. `./fleetwatch.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub fleet: FleetInfo,

    /// Energy proxy model coefficients
    #[serde(default)]
    pub energy: EnergyModel,

    #[serde(default)]
    pub alerts: AlertConfig,

    #[serde(default)]
    pub advisor: AdvisorConfig,
}

impl FleetConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("FLEETWATCH_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), fleet = %config.fleet.name, "loaded config from FLEETWATCH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "failed to load config from FLEETWATCH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "FLEETWATCH_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("fleetwatch.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(fleet = %config.fleet.name, "loaded config from ./fleetwatch.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load ./fleetwatch.toml, using defaults");
                }
            }
        }

        info!("no fleetwatch.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

// ============================================================================
// Global accessor
// ============================================================================

static FLEET_CONFIG: OnceLock<FleetConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// A second call is ignored with a warning.
pub fn init(config: FleetConfig) {
    if FLEET_CONFIG.set(config).is_err() {
        warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
#[allow(clippy::expect_used)]
pub fn get() -> &'static FleetConfig {
    FLEET_CONFIG
        .get()
        .expect("config::get() called before config::init()")
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    FLEET_CONFIG.get().is_some()
}

/// Alert thresholds from the global config, or the built-in defaults when no
/// config has been initialized (plain library use without `init()`).
pub fn alerts() -> AlertConfig {
    FLEET_CONFIG
        .get()
        .map(|c| c.alerts.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_coefficients() {
        let config = FleetConfig::default();
        assert_eq!(config.energy.base_rate, 0.1);
        assert_eq!(config.energy.cpu_weight, 0.3);
        assert_eq!(config.energy.memory_weight, 0.15);
        assert_eq!(config.energy.samples_per_block, 6.0);
        assert_eq!(config.alerts.group_threshold_percent, 40.0);
        assert_eq!(config.advisor.timeout_secs, 30);
    }

    #[test]
    fn partial_toml_fills_remaining_defaults() {
        let config: FleetConfig = toml::from_str(
            r#"
[fleet]
name = "plant-7"

[energy]
cpu_weight = 0.5
"#,
        )
        .unwrap();
        assert_eq!(config.fleet.name, "plant-7");
        assert_eq!(config.energy.cpu_weight, 0.5);
        // Untouched fields keep defaults
        assert_eq!(config.energy.base_rate, 0.1);
        assert_eq!(config.advisor.max_tokens, 350);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[energy\nbase_rate = ").unwrap();
        assert!(matches!(
            FleetConfig::load_from_file(&path).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
