//! Fleet entity store
//!
//! In-memory store for robots, groups, alerts and telemetry readings, shared
//! behind an `Arc` so every component sees the same state. All filtered
//! aggregates the core needs (counts, time-range reads, group membership) are
//! provided here so callers never iterate raw maps.
//!
//! The store owns the alert-uniqueness invariant: `open_alert` performs the
//! duplicate check and the insert inside one write-lock critical section, so
//! concurrent status changes on the same robot cannot create two unresolved
//! alerts of the same type.

mod reports;

pub use reports::{ReportArchive, ReportStoreError};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::{Alert, AlertType, Robot, RobotGroup, RobotReading, RobotStatus};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("robot not found: {0}")]
    RobotNotFound(String),
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("robot already registered: {0}")]
    DuplicateRobot(String),
    #[error("store lock poisoned")]
    LockPoisoned,
}

#[derive(Default)]
struct StoreInner {
    robots: HashMap<String, Robot>,
    groups: HashMap<String, RobotGroup>,
    alerts: Vec<Alert>,
    readings: Vec<RobotReading>,
}

/// Shared in-memory fleet store.
#[derive(Clone, Default)]
pub struct FleetStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl FleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreInner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreInner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }

    // ========================================================================
    // Robots
    // ========================================================================

    /// Register a robot. Fails if the id is already taken.
    pub fn add_robot(&self, robot: Robot) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.robots.contains_key(&robot.robot_id) {
            return Err(StoreError::DuplicateRobot(robot.robot_id));
        }
        debug!(robot_id = %robot.robot_id, "registering robot");
        inner.robots.insert(robot.robot_id.clone(), robot);
        Ok(())
    }

    pub fn robot(&self, robot_id: &str) -> Result<Option<Robot>, StoreError> {
        Ok(self.read()?.robots.get(robot_id).cloned())
    }

    /// All robots, unordered.
    pub fn robots(&self) -> Result<Vec<Robot>, StoreError> {
        Ok(self.read()?.robots.values().cloned().collect())
    }

    pub fn robot_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.robots.len())
    }

    /// Members of a group. Fails if the group does not exist.
    pub fn robots_in_group(&self, group_id: &str) -> Result<Vec<Robot>, StoreError> {
        let inner = self.read()?;
        if !inner.groups.contains_key(group_id) {
            return Err(StoreError::GroupNotFound(group_id.to_string()));
        }
        Ok(inner
            .robots
            .values()
            .filter(|r| r.group_id.as_deref() == Some(group_id))
            .cloned()
            .collect())
    }

    /// Apply a mutation to one robot and stamp its update time.
    pub fn update_robot<F>(&self, robot_id: &str, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Robot),
    {
        let mut inner = self.write()?;
        let robot = inner
            .robots
            .get_mut(robot_id)
            .ok_or_else(|| StoreError::RobotNotFound(robot_id.to_string()))?;
        mutate(robot);
        robot.updated_at = Utc::now();
        Ok(())
    }

    /// Mutate a robot's status, returning the status it held before.
    ///
    /// Callers drive the transition engine explicitly with the returned
    /// previous status; the store never infers transitions from load-time
    /// snapshots.
    pub fn set_status(
        &self,
        robot_id: &str,
        status: RobotStatus,
    ) -> Result<RobotStatus, StoreError> {
        let mut inner = self.write()?;
        let robot = inner
            .robots
            .get_mut(robot_id)
            .ok_or_else(|| StoreError::RobotNotFound(robot_id.to_string()))?;
        let previous = robot.status;
        robot.status = status;
        robot.updated_at = Utc::now();
        Ok(previous)
    }

    // ========================================================================
    // Groups
    // ========================================================================

    pub fn add_group(&self, group: RobotGroup) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner.groups.insert(group.group_id.clone(), group);
        Ok(())
    }

    pub fn group(&self, group_id: &str) -> Result<Option<RobotGroup>, StoreError> {
        Ok(self.read()?.groups.get(group_id).cloned())
    }

    pub fn groups(&self) -> Result<Vec<RobotGroup>, StoreError> {
        Ok(self.read()?.groups.values().cloned().collect())
    }

    /// Assign a robot to a group (or clear with `None`).
    pub fn assign_group(&self, robot_id: &str, group_id: Option<&str>) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if let Some(gid) = group_id {
            if !inner.groups.contains_key(gid) {
                return Err(StoreError::GroupNotFound(gid.to_string()));
            }
        }
        let robot = inner
            .robots
            .get_mut(robot_id)
            .ok_or_else(|| StoreError::RobotNotFound(robot_id.to_string()))?;
        robot.group_id = group_id.map(str::to_string);
        robot.updated_at = Utc::now();
        Ok(())
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Open an alert unless an unresolved alert of the same type already
    /// exists for the robot.
    ///
    /// Returns `Ok(true)` if the alert was inserted, `Ok(false)` if it was
    /// deduplicated. Check and insert happen under one write lock.
    pub fn open_alert(&self, alert: Alert) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        if !inner.robots.contains_key(&alert.robot_id) {
            return Err(StoreError::RobotNotFound(alert.robot_id));
        }
        let duplicate = inner
            .alerts
            .iter()
            .any(|a| !a.resolved && a.robot_id == alert.robot_id && a.alert_type == alert.alert_type);
        if duplicate {
            debug!(robot_id = %alert.robot_id, alert_type = %alert.alert_type, "alert already open, skipping");
            return Ok(false);
        }
        inner.alerts.push(alert);
        Ok(true)
    }

    /// Resolve every unresolved alert for one robot, stamping resolution
    /// times. Returns how many were resolved.
    pub fn resolve_alerts_for(&self, robot_id: &str) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let now = Utc::now();
        let mut resolved = 0;
        for alert in inner
            .alerts
            .iter_mut()
            .filter(|a| !a.resolved && a.robot_id == robot_id)
        {
            alert.resolved = true;
            alert.resolved_at = Some(now);
            resolved += 1;
        }
        Ok(resolved)
    }

    /// Unresolved alerts for one robot, newest first.
    pub fn unresolved_alerts_for(&self, robot_id: &str) -> Result<Vec<Alert>, StoreError> {
        let mut alerts: Vec<Alert> = self
            .read()?
            .alerts
            .iter()
            .filter(|a| !a.resolved && a.robot_id == robot_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    /// All unresolved alerts, newest first.
    pub fn unresolved_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        let mut alerts: Vec<Alert> = self
            .read()?
            .alerts
            .iter()
            .filter(|a| !a.resolved)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    /// Count unresolved alerts of one type across a robot subset.
    pub fn unresolved_count_for(
        &self,
        alert_type: AlertType,
        robot_ids: &[String],
    ) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .alerts
            .iter()
            .filter(|a| {
                !a.resolved && a.alert_type == alert_type && robot_ids.contains(&a.robot_id)
            })
            .count())
    }

    /// Latest unresolved alert for a robot, if any.
    pub fn latest_unresolved_alert(&self, robot_id: &str) -> Result<Option<Alert>, StoreError> {
        Ok(self
            .read()?
            .alerts
            .iter()
            .filter(|a| !a.resolved && a.robot_id == robot_id)
            .max_by_key(|a| a.created_at)
            .cloned())
    }

    // ========================================================================
    // Readings
    // ========================================================================

    /// Append a telemetry sample. Readings are immutable once recorded.
    pub fn record_reading(&self, reading: RobotReading) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if !inner.robots.contains_key(&reading.robot_id) {
            return Err(StoreError::RobotNotFound(reading.robot_id));
        }
        inner.readings.push(reading);
        Ok(())
    }

    /// Readings for a robot subset within `[start, end)`.
    pub fn readings_between(
        &self,
        robot_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RobotReading>, StoreError> {
        Ok(self
            .read()?
            .readings
            .iter()
            .filter(|r| {
                r.timestamp >= start && r.timestamp < end && robot_ids.contains(&r.robot_id)
            })
            .cloned()
            .collect())
    }

    pub fn reading_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.readings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupType, RobotType};
    use chrono::Duration;

    fn store_with_robot(id: &str) -> FleetStore {
        let store = FleetStore::new();
        store
            .add_robot(Robot::new(id, format!("Unit {id}"), RobotType::Warehouse))
            .unwrap();
        store
    }

    #[test]
    fn duplicate_robot_is_rejected() {
        let store = store_with_robot("RBT-001");
        let err = store
            .add_robot(Robot::new("RBT-001", "Copy", RobotType::Delivery))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRobot(_)));
    }

    #[test]
    fn set_status_returns_previous() {
        let store = store_with_robot("RBT-001");
        let prev = store.set_status("RBT-001", RobotStatus::Critical).unwrap();
        assert_eq!(prev, RobotStatus::Active);
        let prev = store.set_status("RBT-001", RobotStatus::Idle).unwrap();
        assert_eq!(prev, RobotStatus::Critical);
    }

    #[test]
    fn open_alert_deduplicates_unresolved_same_type() {
        let store = store_with_robot("RBT-001");
        let inserted = store
            .open_alert(Alert::new("RBT-001", AlertType::Critical, "t", "d"))
            .unwrap();
        assert!(inserted);
        let inserted = store
            .open_alert(Alert::new("RBT-001", AlertType::Critical, "t2", "d2"))
            .unwrap();
        assert!(!inserted);
        assert_eq!(store.unresolved_alerts_for("RBT-001").unwrap().len(), 1);

        // A different type is not a duplicate
        let inserted = store
            .open_alert(Alert::new("RBT-001", AlertType::Warning, "t3", "d3"))
            .unwrap();
        assert!(inserted);
    }

    #[test]
    fn open_alert_allows_reopen_after_resolution() {
        let store = store_with_robot("RBT-001");
        store
            .open_alert(Alert::new("RBT-001", AlertType::Warning, "t", "d"))
            .unwrap();
        assert_eq!(store.resolve_alerts_for("RBT-001").unwrap(), 1);
        let inserted = store
            .open_alert(Alert::new("RBT-001", AlertType::Warning, "t", "d"))
            .unwrap();
        assert!(inserted);
    }

    #[test]
    fn open_alert_requires_known_robot() {
        let store = FleetStore::new();
        let err = store
            .open_alert(Alert::new("ghost", AlertType::Info, "t", "d"))
            .unwrap_err();
        assert!(matches!(err, StoreError::RobotNotFound(_)));
    }

    #[test]
    fn concurrent_open_alert_inserts_exactly_once() {
        let store = store_with_robot("RBT-001");
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store
                    .open_alert(Alert::new("RBT-001", AlertType::Critical, "t", "d"))
                    .unwrap()
            }));
        }
        let inserted: usize = handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();
        assert_eq!(inserted, 1);
        assert_eq!(store.unresolved_alerts_for("RBT-001").unwrap().len(), 1);
    }

    #[test]
    fn readings_filter_by_window_and_robot() {
        let store = store_with_robot("RBT-001");
        store
            .add_robot(Robot::new("RBT-002", "Unit 2", RobotType::Delivery))
            .unwrap();

        let now = Utc::now();
        let robot = store.robot("RBT-001").unwrap().unwrap();
        let mut old = RobotReading::capture(&robot);
        old.timestamp = now - Duration::hours(2);
        store.record_reading(old).unwrap();
        store.record_reading(RobotReading::capture(&robot)).unwrap();
        let other = store.robot("RBT-002").unwrap().unwrap();
        store.record_reading(RobotReading::capture(&other)).unwrap();

        let ids = vec!["RBT-001".to_string()];
        let window = store
            .readings_between(&ids, now - Duration::hours(1), now + Duration::seconds(1))
            .unwrap();
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn group_membership_queries() {
        let store = store_with_robot("RBT-001");
        store
            .add_group(RobotGroup::new("grp-a", "Warehouse A", GroupType::Location))
            .unwrap();
        store.assign_group("RBT-001", Some("grp-a")).unwrap();
        assert_eq!(store.robots_in_group("grp-a").unwrap().len(), 1);
        assert!(matches!(
            store.robots_in_group("grp-missing").unwrap_err(),
            StoreError::GroupNotFound(_)
        ));
    }
}
