//! Alert types: AlertType, Severity, Alert

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::robot::RobotStatus;

// ============================================================================
// Alert Type
// ============================================================================

/// Category of an alert event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Critical,
    #[default]
    Warning,
    Maintenance,
    Info,
}

impl AlertType {
    /// Get display name for UI
    pub fn display_name(self) -> &'static str {
        match self {
            AlertType::Critical => "Critical",
            AlertType::Warning => "Warning",
            AlertType::Maintenance => "Maintenance",
            AlertType::Info => "Info",
        }
    }

    /// Default severity assigned to status-driven alerts of this type.
    pub fn default_severity(self) -> Severity {
        match self {
            AlertType::Critical => Severity::Critical,
            AlertType::Warning => Severity::Medium,
            AlertType::Maintenance | AlertType::Info => Severity::Low,
        }
    }

    /// Alert type raised when a robot enters the given problem status.
    ///
    /// Returns `None` for normal statuses, which raise nothing.
    pub fn for_status(status: RobotStatus) -> Option<Self> {
        match status {
            RobotStatus::Critical => Some(AlertType::Critical),
            RobotStatus::Warning => Some(AlertType::Warning),
            RobotStatus::Maintenance => Some(AlertType::Maintenance),
            RobotStatus::Active | RobotStatus::Idle | RobotStatus::Offline => None,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Severity level 1-4.
///
/// Serialized as the numeric level, not the variant name, so persisted
/// payloads carry the 1-4 domain directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    /// Numeric level (1 = low, 4 = critical).
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Severity for a numeric level, if in range.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Severity::Low),
            2 => Some(Severity::Medium),
            3 => Some(Severity::High),
            4 => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(deserializer)?;
        Severity::from_level(level)
            .ok_or_else(|| serde::de::Error::custom(format!("severity level out of range: {level}")))
    }
}

// ============================================================================
// Alert
// ============================================================================

/// An event record tied to exactly one robot.
///
/// At most one *unresolved* alert of a given type may exist per robot at a
/// time; the store enforces this when opening alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub robot_id: String,
    pub alert_type: AlertType,
    pub severity: Severity,

    pub title: String,
    pub description: String,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,

    /// Measured value that tripped the alert, if threshold-driven
    pub trigger_value: Option<f64>,
    /// Threshold it was compared against
    pub threshold_value: Option<f64>,
}

impl Alert {
    /// Open a new unresolved alert.
    pub fn new(
        robot_id: impl Into<String>,
        alert_type: AlertType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            robot_id: robot_id.into(),
            alert_type,
            severity: alert_type.default_severity(),
            title: title.into(),
            description: description.into(),
            resolved: false,
            resolved_at: None,
            created_at: Utc::now(),
            trigger_value: None,
            threshold_value: None,
        }
    }

    /// Attach the measured value / threshold pair that tripped the alert.
    pub fn with_trigger(mut self, trigger: f64, threshold: f64) -> Self {
        self.trigger_value = Some(trigger);
        self.threshold_value = Some(threshold);
        self
    }

    /// Mark resolved and stamp the resolution time.
    pub fn resolve(&mut self) {
        self.resolved = true;
        self.resolved_at = Some(Utc::now());
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}: {}", self.alert_type, self.robot_id, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_to_alert_type_mapping() {
        assert_eq!(
            AlertType::for_status(RobotStatus::Critical),
            Some(AlertType::Critical)
        );
        assert_eq!(
            AlertType::for_status(RobotStatus::Warning),
            Some(AlertType::Warning)
        );
        assert_eq!(
            AlertType::for_status(RobotStatus::Maintenance),
            Some(AlertType::Maintenance)
        );
        assert_eq!(AlertType::for_status(RobotStatus::Active), None);
        assert_eq!(AlertType::for_status(RobotStatus::Idle), None);
        assert_eq!(AlertType::for_status(RobotStatus::Offline), None);
    }

    #[test]
    fn resolve_stamps_time() {
        let mut alert = Alert::new("RBT-001", AlertType::Warning, "t", "d");
        assert!(!alert.resolved);
        assert!(alert.resolved_at.is_none());
        alert.resolve();
        assert!(alert.resolved);
        assert!(alert.resolved_at.is_some());
    }

    #[test]
    fn severity_levels_are_ordered() {
        assert!(Severity::Critical > Severity::High);
        assert_eq!(Severity::Low.level(), 1);
        assert_eq!(Severity::Critical.level(), 4);
        assert_eq!(AlertType::Critical.default_severity(), Severity::Critical);
    }

    #[test]
    fn severity_serializes_as_numeric_level() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "4");
        assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), "1");

        let parsed: Severity = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Severity::Medium);
        assert!(serde_json::from_str::<Severity>("9").is_err());
        assert!(serde_json::from_str::<Severity>("\"Low\"").is_err());

        let alert = Alert::new("RBT-001", AlertType::Critical, "t", "d");
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["severity"], 4);
    }
}
