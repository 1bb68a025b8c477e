//! Report snapshot types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::TimeWindow;

/// Kind of report being generated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Custom,
    AlertSummary,
    Performance,
    Maintenance,
}

impl ReportType {
    pub fn display_name(self) -> &'static str {
        match self {
            ReportType::Daily => "Daily",
            ReportType::Weekly => "Weekly",
            ReportType::Monthly => "Monthly",
            ReportType::Custom => "Custom",
            ReportType::AlertSummary => "Alert Summary",
            ReportType::Performance => "Performance",
            ReportType::Maintenance => "Maintenance",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A persisted snapshot of aggregator output.
///
/// The payload is the serialized statistics record exactly as computed at
/// generation time; regenerating the same report later may differ as the
/// fleet moves on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub report_type: ReportType,
    pub window: TimeWindow,

    /// Scope the report to one group, or the whole fleet when `None`
    pub group_id: Option<String>,

    pub generated_at: DateTime<Utc>,
    /// Serialized `FleetStats` at generation time
    pub payload: serde_json::Value,
    pub archived: bool,
}
