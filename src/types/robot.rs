//! Core robot types: RobotStatus, RobotType, StatusClass, Robot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Robot Status
// ============================================================================

/// Lifecycle status of a robot.
///
/// Any status may follow any other: the transition graph is unconstrained.
/// Side effects on a transition depend only on the [`StatusClass`] of the
/// old and new status, never on the specific edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    #[default]
    Active,
    Idle,
    Warning,
    Critical,
    Maintenance,
    Offline,
}

/// Partition of [`RobotStatus`] into normal and problem states.
///
/// NORMAL = {Active, Idle, Offline}, PROBLEM = {Warning, Critical, Maintenance}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Normal,
    Problem,
}

impl RobotStatus {
    /// Classify this status as normal or problem.
    pub fn class(self) -> StatusClass {
        match self {
            RobotStatus::Active | RobotStatus::Idle | RobotStatus::Offline => StatusClass::Normal,
            RobotStatus::Warning | RobotStatus::Critical | RobotStatus::Maintenance => {
                StatusClass::Problem
            }
        }
    }

    /// A robot in Active or Idle counts toward uptime.
    pub fn counts_as_up(self) -> bool {
        matches!(self, RobotStatus::Active | RobotStatus::Idle)
    }

    /// Get display name for UI
    pub fn display_name(self) -> &'static str {
        match self {
            RobotStatus::Active => "Active",
            RobotStatus::Idle => "Idle",
            RobotStatus::Warning => "Warning",
            RobotStatus::Critical => "Critical",
            RobotStatus::Maintenance => "Under Maintenance",
            RobotStatus::Offline => "Offline",
        }
    }

    /// Parse from string (for API/config)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(RobotStatus::Active),
            "idle" => Some(RobotStatus::Idle),
            "warning" => Some(RobotStatus::Warning),
            "critical" => Some(RobotStatus::Critical),
            "maintenance" => Some(RobotStatus::Maintenance),
            "offline" => Some(RobotStatus::Offline),
            _ => None,
        }
    }
}

impl std::fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Robot Type
// ============================================================================

/// Functional category of a robot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RobotType {
    #[default]
    Warehouse,
    Production,
    Delivery,
    Inspection,
    Cleaning,
    Security,
}

impl RobotType {
    /// Get display name for UI
    pub fn display_name(self) -> &'static str {
        match self {
            RobotType::Warehouse => "Warehouse",
            RobotType::Production => "Production",
            RobotType::Delivery => "Delivery",
            RobotType::Inspection => "Inspection",
            RobotType::Cleaning => "Cleaning",
            RobotType::Security => "Security",
        }
    }
}

impl std::fmt::Display for RobotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Robot
// ============================================================================

/// A managed fleet unit.
///
/// Numeric gauges (battery, cpu, memory) are clamped to their domain range by
/// the mutators, never by storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    /// Stable identifier, e.g. "RBT-001"
    pub robot_id: String,
    pub name: String,
    pub robot_type: RobotType,
    pub status: RobotStatus,

    /// Battery charge, 0-100 %
    pub battery_level: f64,
    /// Chassis temperature, °C
    pub temperature: f64,
    /// CPU load, 0-100 %
    pub cpu_load: f64,
    /// Memory usage, 0-100 %
    pub memory_usage: f64,

    pub location: String,
    pub current_task: Option<String>,
    /// Lifetime counter of tasks assigned to this unit
    pub assigned_tasks: u64,
    /// Cumulative operational hours
    pub operational_hours: f64,

    pub last_maintenance: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Optional group membership
    pub group_id: Option<String>,
}

impl Robot {
    /// Create a robot with nominal gauges and an Active status.
    pub fn new(robot_id: impl Into<String>, name: impl Into<String>, robot_type: RobotType) -> Self {
        let now = Utc::now();
        Self {
            robot_id: robot_id.into(),
            name: name.into(),
            robot_type,
            status: RobotStatus::Active,
            battery_level: 100.0,
            temperature: 25.0,
            cpu_load: 0.0,
            memory_usage: 0.0,
            location: String::new(),
            current_task: None,
            assigned_tasks: 0,
            operational_hours: 0.0,
            last_maintenance: None,
            created_at: now,
            updated_at: now,
            group_id: None,
        }
    }

    /// Set battery level, clamped to 0-100.
    pub fn set_battery_level(&mut self, percent: f64) {
        self.battery_level = percent.clamp(0.0, 100.0);
        self.updated_at = Utc::now();
    }

    /// Set CPU load, clamped to 0-100.
    pub fn set_cpu_load(&mut self, percent: f64) {
        self.cpu_load = percent.clamp(0.0, 100.0);
        self.updated_at = Utc::now();
    }

    /// Set memory usage, clamped to 0-100.
    pub fn set_memory_usage(&mut self, percent: f64) {
        self.memory_usage = percent.clamp(0.0, 100.0);
        self.updated_at = Utc::now();
    }

    /// Set chassis temperature. Temperature has no domain clamp.
    pub fn set_temperature(&mut self, celsius: f64) {
        self.temperature = celsius;
        self.updated_at = Utc::now();
    }

    /// A unit that is doing (or could be doing) work: active, idle or warning.
    pub fn is_operational(&self) -> bool {
        matches!(
            self.status,
            RobotStatus::Active | RobotStatus::Idle | RobotStatus::Warning
        )
    }

    /// A unit an operator should look at: problem status, low battery or
    /// elevated temperature, judged against the deployment's `[alerts]`
    /// thresholds.
    pub fn needs_attention(&self) -> bool {
        self.needs_attention_with(&crate::config::alerts())
    }

    /// Same predicate against explicit thresholds.
    pub fn needs_attention_with(&self, thresholds: &crate::config::AlertConfig) -> bool {
        matches!(self.status, RobotStatus::Warning | RobotStatus::Critical)
            || self.battery_level < thresholds.low_battery_percent
            || self.temperature > thresholds.high_temperature_c
    }
}

impl std::fmt::Display for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.robot_id)
    }
}
