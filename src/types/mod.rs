//! Core data model for the fleet monitoring core.
//!
//! Entity relationships: Robot 1-N Alert, Robot 1-N RobotReading,
//! RobotGroup 1-N Robot (optional membership), RobotGroup 1-N Report
//! (optional scope).

mod alert;
mod group;
mod report;
mod robot;
mod telemetry;

pub use alert::{Alert, AlertType, Severity};
pub use group::{GroupType, RobotGroup};
pub use report::{Report, ReportType};
pub use robot::{Robot, RobotStatus, RobotType, StatusClass};
pub use telemetry::RobotReading;
