//! Status Transition Engine
//!
//! Governs how a robot's status change produces, suppresses, or resolves
//! alerts. The transition graph is unconstrained; side effects depend only on
//! the class change (NORMAL vs PROBLEM), planned by the pure
//! [`plan_transition`] and applied against the store by
//! [`TransitionEngine::apply_status_change`].
//!
//! A transition between two different PROBLEM types (e.g. warning to
//! critical) opens the new alert without resolving the stale one. Both stay
//! unresolved until the robot returns to a normal status. That is a product
//! decision carried over deliberately; change it in `plan_transition` if the
//! policy changes.

use tracing::{debug, info};

use crate::store::{FleetStore, StoreError};
use crate::types::{Alert, AlertType, RobotStatus, StatusClass};

/// Side effect a status transition calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    /// Open an alert of this type unless one is already unresolved
    OpenAlert(AlertType),
    /// Resolve every unresolved alert for the robot
    ResolveAll,
    /// Nothing to do
    Noop,
}

/// Pure transition policy: what does moving `old` -> `new` call for?
///
/// No store access, no clock. Same-status transitions are a no-op even for
/// problem statuses; the dedup in the store is a second line of defense for
/// concurrent writers.
pub fn plan_transition(old: RobotStatus, new: RobotStatus) -> TransitionAction {
    if old == new {
        return TransitionAction::Noop;
    }
    match new.class() {
        StatusClass::Normal => TransitionAction::ResolveAll,
        StatusClass::Problem => match AlertType::for_status(new) {
            Some(alert_type) => TransitionAction::OpenAlert(alert_type),
            // Unreachable: every problem status maps to an alert type
            None => TransitionAction::Noop,
        },
    }
}

/// Applies status transitions against a store.
#[derive(Clone)]
pub struct TransitionEngine {
    store: FleetStore,
}

impl TransitionEngine {
    pub fn new(store: FleetStore) -> Self {
        Self { store }
    }

    /// Apply the side effects of a status change that has already been
    /// written to the robot.
    ///
    /// `previous` is the status the robot held immediately before the
    /// mutation; callers get it from [`FleetStore::set_status`]. The engine
    /// never infers it from stored state.
    pub fn apply_status_change(
        &self,
        robot_id: &str,
        previous: RobotStatus,
        current: RobotStatus,
    ) -> Result<(), StoreError> {
        match plan_transition(previous, current) {
            TransitionAction::Noop => {
                debug!(robot_id, status = %current, "status unchanged, no transition side effects");
                Ok(())
            }
            TransitionAction::ResolveAll => {
                let resolved = self.store.resolve_alerts_for(robot_id)?;
                if resolved > 0 {
                    info!(robot_id, from = %previous, to = %current, resolved, "robot back to normal, alerts resolved");
                }
                Ok(())
            }
            TransitionAction::OpenAlert(alert_type) => {
                let alert = self.build_alert(robot_id, alert_type, current)?;
                let inserted = self.store.open_alert(alert)?;
                if inserted {
                    info!(robot_id, from = %previous, to = %current, alert_type = %alert_type, "problem status, alert opened");
                }
                Ok(())
            }
        }
    }

    /// Convenience: write the new status through the store and apply the
    /// transition in one call.
    pub fn transition(&self, robot_id: &str, new: RobotStatus) -> Result<(), StoreError> {
        let previous = self.store.set_status(robot_id, new)?;
        self.apply_status_change(robot_id, previous, new)
    }

    fn build_alert(
        &self,
        robot_id: &str,
        alert_type: AlertType,
        status: RobotStatus,
    ) -> Result<Alert, StoreError> {
        let name = self
            .store
            .robot(robot_id)?
            .map(|r| r.name)
            .unwrap_or_else(|| robot_id.to_string());

        let (title, description) = match alert_type {
            AlertType::Critical => (
                format!("Critical status - {robot_id}"),
                format!("Robot {name} entered critical status: {status}"),
            ),
            AlertType::Warning => (
                format!("Warning - {robot_id}"),
                format!("Robot {name} entered warning status: {status}"),
            ),
            AlertType::Maintenance => (
                format!("Maintenance - {robot_id}"),
                format!("Robot {name} was taken into maintenance: {status}"),
            ),
            AlertType::Info => (
                format!("Notice - {robot_id}"),
                format!("Robot {name} status changed: {status}"),
            ),
        };

        Ok(Alert::new(robot_id, alert_type, title, description))
    }
}
