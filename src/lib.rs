//! Fleetwatch: Robot Fleet Monitoring Core
//!
//! Status lifecycle, alerting, and fleet aggregation for a robot fleet.
//!
//! ## Architecture
//!
//! - **Status Transition Engine**: turns robot status changes into alert
//!   side effects (open on problem, resolve on return to normal)
//! - **Fleet Aggregator**: rollup statistics (uptime %, telemetry averages,
//!   energy estimate, comparative deltas) over a population and time window
//! - **Fleet Store**: shared in-memory entity store plus a sled-backed
//!   report archive
//! - **Advisor**: glue client for an external chat-completion API producing
//!   natural-language fleet summaries

pub mod advisor;
pub mod aggregation;
pub mod config;
pub mod lifecycle;
pub mod reporting;
pub mod store;
pub mod types;

// Re-export deployment configuration
pub use config::FleetConfig;

// Re-export commonly used types
pub use types::{
    Alert, AlertType, Report, ReportType, Robot, RobotGroup, RobotReading, RobotStatus,
    RobotType, Severity, StatusClass,
};

// Re-export the engine and aggregator
pub use aggregation::{
    EnergyModel, FleetAggregator, FleetStats, GroupStats, MetricDelta, TimeWindow, TrendDirection,
};
pub use lifecycle::{plan_transition, TransitionAction, TransitionEngine};

// Re-export storage
pub use store::{FleetStore, ReportArchive, ReportStoreError, StoreError};

// Re-export the advisor client
pub use advisor::{build_fleet_context, AdvisorError, CompletionClient};

// Re-export report generation
pub use reporting::{ReportError, ReportGenerator};
