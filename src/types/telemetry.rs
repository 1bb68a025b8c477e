//! Telemetry sample type: RobotReading

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::robot::RobotStatus;

/// One immutable timestamped sensor sample for a robot.
///
/// Append-only aggregation input: readings are never mutated after capture.
/// The robot's status at sample time is recorded so windowed uptime can be
/// computed from history alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotReading {
    pub robot_id: String,
    pub timestamp: DateTime<Utc>,

    /// Status the robot held when the sample was taken
    pub status: RobotStatus,

    pub temperature: f64,
    pub battery_level: f64,
    pub cpu_load: f64,
    pub memory_usage: f64,

    pub location_x: f64,
    pub location_y: f64,
    pub active_tasks: u32,

    pub signal_strength: Option<f64>,
    pub error_count: u32,
}

impl RobotReading {
    /// Capture a sample from a robot's current gauges.
    pub fn capture(robot: &crate::types::Robot) -> Self {
        Self {
            robot_id: robot.robot_id.clone(),
            timestamp: Utc::now(),
            status: robot.status,
            temperature: robot.temperature,
            battery_level: robot.battery_level,
            cpu_load: robot.cpu_load,
            memory_usage: robot.memory_usage,
            location_x: 0.0,
            location_y: 0.0,
            active_tasks: u32::from(robot.current_task.is_some()),
            signal_strength: None,
            error_count: 0,
        }
    }

    /// Place the sample at a 2D position.
    pub fn at_position(mut self, x: f64, y: f64) -> Self {
        self.location_x = x;
        self.location_y = y;
        self
    }
}
