//! Grouping types: GroupType, RobotGroup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a group partitions the fleet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Location,
    Function,
    Priority,
    #[default]
    Custom,
}

impl GroupType {
    pub fn display_name(self) -> &'static str {
        match self {
            GroupType::Location => "By Location",
            GroupType::Function => "By Function",
            GroupType::Priority => "By Priority",
            GroupType::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A named collection of robots with group-level monitoring settings.
///
/// Member count and active member count are derived from the store, never
/// stored on the group itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotGroup {
    pub group_id: String,
    pub name: String,
    pub group_type: GroupType,
    pub description: Option<String>,

    /// Group-level alert threshold, percent
    pub alert_threshold: f64,
    /// Free-text maintenance schedule, e.g. "every Monday 06:00"
    pub maintenance_schedule: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RobotGroup {
    pub fn new(group_id: impl Into<String>, name: impl Into<String>, group_type: GroupType) -> Self {
        let now = Utc::now();
        Self {
            group_id: group_id.into(),
            name: name.into(),
            group_type,
            description: None,
            alert_threshold: crate::config::alerts().group_threshold_percent,
            maintenance_schedule: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl std::fmt::Display for RobotGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
