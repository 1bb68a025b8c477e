//! Energy estimation model
//!
//! A synthetic linear model over windowed telemetry, not measured power
//! draw. Treat the output as a proxy metric for dashboards and trend
//! comparison only.
//!
//! `estimate = blocks * (base_rate + avg_cpu * cpu_weight + avg_mem * memory_weight)`
//!
//! where `blocks = sample_count / samples_per_block` and the utilization
//! averages are normalized to 0..1. All coefficients are operator-tunable
//! through the `[energy]` config section.

use serde::{Deserialize, Serialize};

use crate::types::RobotReading;

/// Coefficients for the linear energy proxy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnergyModel {
    /// Baseline consumption per sample block, kWh
    pub base_rate: f64,
    /// Weight of average CPU utilization (0..1)
    pub cpu_weight: f64,
    /// Weight of average memory utilization (0..1)
    pub memory_weight: f64,
    /// Samples per normalization block
    pub samples_per_block: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            base_rate: 0.1,
            cpu_weight: 0.3,
            memory_weight: 0.15,
            samples_per_block: 6.0,
        }
    }
}

impl EnergyModel {
    /// Estimate energy for a set of windowed readings, in kWh.
    ///
    /// Zero readings estimate to exactly 0.0. Non-negative whenever the
    /// coefficients and utilization averages are non-negative.
    pub fn estimate(&self, readings: &[RobotReading]) -> f64 {
        if readings.is_empty() || self.samples_per_block <= 0.0 {
            return 0.0;
        }

        let n = readings.len() as f64;
        let avg_cpu = readings.iter().map(|r| r.cpu_load).sum::<f64>() / n / 100.0;
        let avg_mem = readings.iter().map(|r| r.memory_usage).sum::<f64>() / n / 100.0;

        let blocks = n / self.samples_per_block;
        blocks * (self.base_rate + avg_cpu * self.cpu_weight + avg_mem * self.memory_weight)
    }
}
