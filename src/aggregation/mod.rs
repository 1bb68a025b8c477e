//! Fleet Aggregator
//!
//! Computes rollup statistics (uptime %, telemetry averages, energy estimate,
//! alert counts) over a robot population and a trailing time window, at the
//! fleet level and per group. Pull-based: every call recomputes from current
//! store contents plus the reading history, nothing is cached.
//!
//! Uptime is two-tier by design: windowed reading samples when any exist,
//! otherwise a snapshot ratio of robots currently in {Active, Idle}. Sparse
//! telemetry history therefore degrades to a defined number instead of an
//! undefined ratio.

mod energy;

pub use energy::EnergyModel;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{FleetStore, StoreError};
use crate::types::{AlertType, Robot, RobotReading, RobotStatus};

// ============================================================================
// Time windows
// ============================================================================

/// Trailing time window presets for aggregation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Last hour
    H1,
    /// Last 10 hours
    H10,
    /// Last 24 hours
    #[default]
    H24,
    /// Last 7 days
    D7,
    /// Last 30 days
    D30,
}

impl TimeWindow {
    pub fn duration(self) -> Duration {
        match self {
            TimeWindow::H1 => Duration::hours(1),
            TimeWindow::H10 => Duration::hours(10),
            TimeWindow::H24 => Duration::hours(24),
            TimeWindow::D7 => Duration::days(7),
            TimeWindow::D30 => Duration::days(30),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeWindow::H1 => "Last hour",
            TimeWindow::H10 => "Last 10 hours",
            TimeWindow::H24 => "Last 24 hours",
            TimeWindow::D7 => "Last 7 days",
            TimeWindow::D30 => "Last 30 days",
        }
    }

    /// Parse from string (for API/config)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1h" | "h1" => Some(TimeWindow::H1),
            "10h" | "h10" => Some(TimeWindow::H10),
            "24h" | "h24" => Some(TimeWindow::H24),
            "7d" | "d7" => Some(TimeWindow::D7),
            "30d" | "d30" => Some(TimeWindow::D30),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Comparative deltas
// ============================================================================

/// Direction tag for a paired metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

/// A headline metric paired with the same computation over the preceding
/// window of equal length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricDelta {
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    pub direction: TrendDirection,
}

impl MetricDelta {
    /// Pair `current` with a baseline.
    ///
    /// When the baseline is absent or zero, the current value is used as
    /// baseline, yielding delta 0 and Neutral instead of an infinite ratio.
    pub fn compare(current: f64, baseline: Option<f64>) -> Self {
        let previous = match baseline {
            Some(b) if b != 0.0 => b,
            _ => current,
        };
        let delta = current - previous;
        let direction = if delta > 0.0 {
            TrendDirection::Up
        } else if delta < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Neutral
        };
        Self {
            current,
            previous,
            delta,
            direction,
        }
    }

    /// Percent change relative to the baseline. Baseline is never zero here
    /// by construction of `compare`, except when current is also zero.
    pub fn percent_change(&self) -> f64 {
        if self.previous == 0.0 {
            0.0
        } else {
            self.delta / self.previous * 100.0
        }
    }
}

// ============================================================================
// Statistics records
// ============================================================================

/// Per-group rollup. Groups with zero current members are skipped, never
/// zero-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStats {
    pub group_id: String,
    pub name: String,
    pub robot_count: usize,
    pub active_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub maintenance_count: usize,
    pub uptime_percent: f64,
    pub avg_battery: f64,
    pub open_alerts: usize,
}

/// Per-location rollup over the current snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationStats {
    pub location: String,
    pub robot_count: usize,
    pub avg_battery: f64,
    pub avg_temperature: f64,
}

/// Flat fleet statistics record for one window, suitable for direct
/// presentation. Always fully populated; degenerate inputs yield zeros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetStats {
    pub window: TimeWindow,
    pub computed_at: DateTime<Utc>,

    pub total_robots: usize,
    pub active_robots: usize,
    pub maintenance_robots: usize,

    /// Uptime %, windowed with snapshot fallback
    pub uptime: MetricDelta,
    /// Observed task activity over the window
    pub tasks_completed: MetricDelta,
    /// Energy proxy estimate, kWh
    pub energy_kwh: MetricDelta,

    pub avg_battery: f64,
    pub avg_temperature: f64,

    pub critical_alerts: usize,
    pub warning_alerts: usize,
    pub maintenance_alerts: usize,

    pub groups: Vec<GroupStats>,
    pub locations: Vec<LocationStats>,
}

// ============================================================================
// Aggregator
// ============================================================================

/// Computes fleet statistics from the entity store.
#[derive(Clone)]
pub struct FleetAggregator {
    store: FleetStore,
    energy: EnergyModel,
}

impl FleetAggregator {
    pub fn new(store: FleetStore) -> Self {
        Self {
            store,
            energy: EnergyModel::default(),
        }
    }

    pub fn with_energy_model(store: FleetStore, energy: EnergyModel) -> Self {
        Self { store, energy }
    }

    /// Compute the full statistics record for a trailing window.
    pub fn compute_fleet_stats(&self, window: TimeWindow) -> Result<FleetStats, StoreError> {
        self.compute_stats_at(window, Utc::now())
    }

    /// Same as [`compute_fleet_stats`](Self::compute_fleet_stats) but with an
    /// explicit reference time, for reproducible aggregation in tests and
    /// report generation.
    pub fn compute_stats_at(
        &self,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<FleetStats, StoreError> {
        let robots = self.store.robots()?;
        let ids: Vec<String> = robots.iter().map(|r| r.robot_id.clone()).collect();

        let dur = window.duration();
        let current_start = now - dur;
        let previous_start = now - dur - dur;

        let current_readings = self.store.readings_between(&ids, current_start, now)?;
        let previous_readings = self
            .store
            .readings_between(&ids, previous_start, current_start)?;

        debug!(
            window = %window,
            robots = robots.len(),
            current_samples = current_readings.len(),
            previous_samples = previous_readings.len(),
            "computing fleet stats"
        );

        let uptime_now = uptime_percent(&current_readings, &robots);
        let uptime_baseline = (!previous_readings.is_empty())
            .then(|| sample_uptime_percent(&previous_readings));

        let tasks_now = task_activity(&current_readings, &robots);
        let tasks_baseline =
            (!previous_readings.is_empty()).then(|| sample_task_activity(&previous_readings));

        let energy_now = self.energy.estimate(&current_readings);
        let energy_baseline =
            (!previous_readings.is_empty()).then(|| self.energy.estimate(&previous_readings));

        let groups = self.compute_group_stats(window, now)?;

        Ok(FleetStats {
            window,
            computed_at: now,
            total_robots: robots.len(),
            active_robots: robots.iter().filter(|r| r.status.counts_as_up()).count(),
            maintenance_robots: robots
                .iter()
                .filter(|r| r.status == RobotStatus::Maintenance)
                .count(),
            uptime: MetricDelta::compare(uptime_now, uptime_baseline),
            tasks_completed: MetricDelta::compare(tasks_now, tasks_baseline),
            energy_kwh: MetricDelta::compare(energy_now, energy_baseline),
            avg_battery: mean(robots.iter().map(|r| r.battery_level)),
            avg_temperature: mean(robots.iter().map(|r| r.temperature)),
            critical_alerts: self.store.unresolved_count_for(AlertType::Critical, &ids)?,
            warning_alerts: self.store.unresolved_count_for(AlertType::Warning, &ids)?,
            maintenance_alerts: self
                .store
                .unresolved_count_for(AlertType::Maintenance, &ids)?,
            groups,
            locations: location_stats(&robots),
        })
    }

    /// Identical per-metric logic applied to each group's member subset.
    fn compute_group_stats(
        &self,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<GroupStats>, StoreError> {
        let mut stats = Vec::new();

        for group in self.store.groups()? {
            let members = self.store.robots_in_group(&group.group_id)?;
            if members.is_empty() {
                continue;
            }
            let member_ids: Vec<String> = members.iter().map(|r| r.robot_id.clone()).collect();
            let readings =
                self.store
                    .readings_between(&member_ids, now - window.duration(), now)?;

            let open_alerts = self
                .store
                .unresolved_count_for(AlertType::Critical, &member_ids)?
                + self
                    .store
                    .unresolved_count_for(AlertType::Warning, &member_ids)?
                + self
                    .store
                    .unresolved_count_for(AlertType::Maintenance, &member_ids)?
                + self.store.unresolved_count_for(AlertType::Info, &member_ids)?;

            stats.push(GroupStats {
                group_id: group.group_id,
                name: group.name,
                robot_count: members.len(),
                active_count: members.iter().filter(|r| r.status.counts_as_up()).count(),
                warning_count: members
                    .iter()
                    .filter(|r| r.status == RobotStatus::Warning)
                    .count(),
                critical_count: members
                    .iter()
                    .filter(|r| r.status == RobotStatus::Critical)
                    .count(),
                maintenance_count: members
                    .iter()
                    .filter(|r| r.status == RobotStatus::Maintenance)
                    .count(),
                uptime_percent: uptime_percent(&readings, &members),
                avg_battery: mean(members.iter().map(|r| r.battery_level)),
                open_alerts,
            });
        }

        stats.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stats)
    }
}

// ============================================================================
// Metric helpers
// ============================================================================

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Uptime % over windowed samples, falling back to the current snapshot when
/// the window holds zero readings. Always in [0, 100]; 0 for an empty
/// population in both tiers.
fn uptime_percent(readings: &[RobotReading], robots: &[Robot]) -> f64 {
    if !readings.is_empty() {
        return sample_uptime_percent(readings);
    }
    if robots.is_empty() {
        return 0.0;
    }
    let up = robots.iter().filter(|r| r.status.counts_as_up()).count();
    up as f64 / robots.len() as f64 * 100.0
}

fn sample_uptime_percent(readings: &[RobotReading]) -> f64 {
    if readings.is_empty() {
        return 0.0;
    }
    let up = readings.iter().filter(|r| r.status.counts_as_up()).count();
    up as f64 / readings.len() as f64 * 100.0
}

/// Observed task activity: windowed sample sum, falling back to the lifetime
/// assigned-task counters when the window holds zero readings.
fn task_activity(readings: &[RobotReading], robots: &[Robot]) -> f64 {
    if !readings.is_empty() {
        return sample_task_activity(readings);
    }
    robots.iter().map(|r| r.assigned_tasks as f64).sum()
}

fn sample_task_activity(readings: &[RobotReading]) -> f64 {
    readings.iter().map(|r| f64::from(r.active_tasks)).sum()
}

/// Snapshot rollup of robot count and telemetry averages per location string.
fn location_stats(robots: &[Robot]) -> Vec<LocationStats> {
    let mut by_location: std::collections::BTreeMap<&str, Vec<&Robot>> =
        std::collections::BTreeMap::new();
    for robot in robots {
        by_location.entry(robot.location.as_str()).or_default().push(robot);
    }

    by_location
        .into_iter()
        .map(|(location, members)| LocationStats {
            location: location.to_string(),
            robot_count: members.len(),
            avg_battery: mean(members.iter().map(|r| r.battery_level)),
            avg_temperature: mean(members.iter().map(|r| r.temperature)),
        })
        .collect()
}
