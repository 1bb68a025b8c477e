//! System-wide default constants.
//!
//! Centralises magic numbers shared across modules. Grouped by subsystem.

// ============================================================================
// Alerts
// ============================================================================

/// Default group-level alert threshold (percent).
pub const DEFAULT_GROUP_ALERT_THRESHOLD_PERCENT: f64 = 40.0;

/// Battery level below which a robot needs operator attention (percent).
pub const LOW_BATTERY_ATTENTION_PERCENT: f64 = 30.0;

/// Temperature above which a robot needs operator attention (°C).
pub const HIGH_TEMPERATURE_ATTENTION_C: f64 = 45.0;

// ============================================================================
// Advisor (chat-completion API)
// ============================================================================

/// HTTP client timeout for advisor requests (seconds). Timeout is a hard
/// failure, not a retry trigger.
pub const ADVISOR_HTTP_TIMEOUT_SECS: u64 = 30;

/// Token cap for advisor completions.
pub const ADVISOR_MAX_TOKENS: u32 = 350;

/// Sampling temperature for advisor completions.
pub const ADVISOR_TEMPERATURE: f64 = 0.4;

/// Maximum error-body excerpt carried in advisor errors (characters).
pub const ADVISOR_ERROR_BODY_LIMIT: usize = 500;

/// Default chat-completion model name.
pub const ADVISOR_DEFAULT_MODEL: &str = "Qwen/Qwen2.5-7B-Instruct";

/// Environment variable holding the advisor API token.
pub const ADVISOR_TOKEN_ENV: &str = "FLEETWATCH_ADVISOR_TOKEN";

// ============================================================================
// Simulation
// ============================================================================

/// Default telemetry sample interval for the simulator (seconds).
pub const SIM_SAMPLE_INTERVAL_SECS: u64 = 600;
