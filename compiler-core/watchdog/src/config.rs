use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_MAX_ITERATIONS: u64 = 4000;
pub const DEFAULT_MAX_TIME: Duration = Duration::from_millis(250);
pub const DEFAULT_IDLE_RESET: Duration = Duration::from_millis(5);

/// Resolved thresholds, always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogConfig {
    pub enabled: bool,
    /// A loop trips once it runs more than this many iterations.
    pub max_iterations: u64,
    /// A loop trips once it runs for longer than this.
    pub max_time: Duration,
    /// Loop state is forgotten after this long without a guard call.
    pub idle_reset: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> WatchdogConfig {
        WatchdogConfig {
            enabled: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_time: DEFAULT_MAX_TIME,
            idle_reset: DEFAULT_IDLE_RESET,
        }
    }
}

/// Host-provided settings, where every field is optional.
///
/// Values with the wrong type deserialize as absent, so a host can't
/// disable the watchdog by accident with a malformed field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchdogOverrides {
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub max_time_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub idle_reset_ms: Option<f64>,
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

impl WatchdogConfig {
    /// Applies `overrides` on top of the defaults, ignoring invalid values.
    pub fn from_overrides(overrides: &WatchdogOverrides) -> WatchdogConfig {
        let defaults = WatchdogConfig::default();

        let enabled = overrides.enabled.unwrap_or(defaults.enabled);
        let max_iterations = overrides
            .max_iterations
            .filter(|value| value.is_finite())
            .map(f64::floor)
            .filter(|&value| value >= 1.0)
            .map(|value| value as u64)
            .unwrap_or(defaults.max_iterations);
        let max_time = overrides.max_time_ms.and_then(positive_millis).unwrap_or(defaults.max_time);
        let idle_reset =
            overrides.idle_reset_ms.and_then(positive_millis).unwrap_or(defaults.idle_reset);

        WatchdogConfig { enabled, max_iterations, max_time, idle_reset }
    }

    /// Reads overrides from a JSON object.
    pub fn from_json(text: &str) -> Result<WatchdogConfig, serde_json::Error> {
        let overrides: WatchdogOverrides = serde_json::from_str(text)?;
        Ok(WatchdogConfig::from_overrides(&overrides))
    }

    pub fn disabled() -> WatchdogConfig {
        WatchdogConfig { enabled: false, ..WatchdogConfig::default() }
    }
}

impl From<WatchdogConfig> for WatchdogOverrides {
    fn from(config: WatchdogConfig) -> WatchdogOverrides {
        WatchdogOverrides {
            enabled: Some(config.enabled),
            max_iterations: Some(config.max_iterations as f64),
            max_time_ms: Some(config.max_time.as_secs_f64() * 1000.0),
            idle_reset_ms: Some(config.idle_reset.as_secs_f64() * 1000.0),
        }
    }
}

fn positive_millis(milliseconds: f64) -> Option<Duration> {
    if !milliseconds.is_finite() || milliseconds <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(milliseconds / 1000.0).ok()
}
