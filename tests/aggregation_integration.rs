//! Fleet aggregation integration tests
//!
//! Covers the two-tier uptime computation, comparative deltas, group
//! breakdowns, and report generation against a populated store.

use chrono::{DateTime, Duration, Utc};
use fleetwatch::aggregation::{FleetAggregator, TimeWindow, TrendDirection};
use fleetwatch::lifecycle::TransitionEngine;
use fleetwatch::reporting::{ReportError, ReportGenerator};
use fleetwatch::store::{FleetStore, ReportArchive, StoreError};
use fleetwatch::types::{
    GroupType, ReportType, Robot, RobotGroup, RobotReading, RobotStatus, RobotType,
};

fn add_robot(store: &FleetStore, id: &str, status: RobotStatus) {
    let mut robot = Robot::new(id, format!("Unit {id}"), RobotType::Warehouse);
    robot.status = status;
    store.add_robot(robot).unwrap();
}

fn reading_at(
    store: &FleetStore,
    robot_id: &str,
    status: RobotStatus,
    timestamp: DateTime<Utc>,
) -> RobotReading {
    let robot = store.robot(robot_id).unwrap().unwrap();
    let mut reading = RobotReading::capture(&robot);
    reading.status = status;
    reading.timestamp = timestamp;
    reading
}

#[test]
fn snapshot_fallback_uptime_for_fleet_without_readings() {
    // 10 robots, 6 in {active, idle}, zero readings in the window
    let store = FleetStore::new();
    for i in 0..4 {
        add_robot(&store, &format!("UP-A{i}"), RobotStatus::Active);
    }
    for i in 0..2 {
        add_robot(&store, &format!("UP-I{i}"), RobotStatus::Idle);
    }
    for i in 0..2 {
        add_robot(&store, &format!("DN-C{i}"), RobotStatus::Critical);
    }
    add_robot(&store, "DN-M0", RobotStatus::Maintenance);
    add_robot(&store, "DN-O0", RobotStatus::Offline);

    let stats = FleetAggregator::new(store)
        .compute_fleet_stats(TimeWindow::H24)
        .unwrap();

    assert_eq!(stats.total_robots, 10);
    assert_eq!(stats.active_robots, 6);
    assert_eq!(stats.uptime.current, 60.0);
    assert_eq!(stats.uptime.direction, TrendDirection::Neutral);
}

#[test]
fn empty_fleet_yields_zeroed_stats() {
    let stats = FleetAggregator::new(FleetStore::new())
        .compute_fleet_stats(TimeWindow::H1)
        .unwrap();

    assert_eq!(stats.total_robots, 0);
    assert_eq!(stats.uptime.current, 0.0);
    assert_eq!(stats.energy_kwh.current, 0.0);
    assert_eq!(stats.avg_battery, 0.0);
    assert!(stats.groups.is_empty());
    assert!(stats.locations.is_empty());
}

#[test]
fn windowed_samples_take_precedence_over_snapshot() {
    // The robot is critical right now, but spent most of the window up.
    let store = FleetStore::new();
    add_robot(&store, "RBT-001", RobotStatus::Critical);

    let now = Utc::now();
    for minutes in [50, 40, 30, 20] {
        store
            .record_reading(reading_at(
                &store,
                "RBT-001",
                RobotStatus::Active,
                now - Duration::minutes(minutes),
            ))
            .unwrap();
    }
    store
        .record_reading(reading_at(
            &store,
            "RBT-001",
            RobotStatus::Critical,
            now - Duration::minutes(10),
        ))
        .unwrap();

    let stats = FleetAggregator::new(store)
        .compute_stats_at(TimeWindow::H1, now)
        .unwrap();

    // 4 of 5 samples up, snapshot (0%) ignored
    assert_eq!(stats.uptime.current, 80.0);
}

#[test]
fn uptime_always_within_bounds() {
    let store = FleetStore::new();
    add_robot(&store, "RBT-001", RobotStatus::Offline);
    let stats = FleetAggregator::new(store)
        .compute_fleet_stats(TimeWindow::D7)
        .unwrap();
    assert!(stats.uptime.current >= 0.0);
    assert!(stats.uptime.current <= 100.0);
    assert_eq!(stats.uptime.current, 0.0);
}

#[test]
fn previous_window_drives_delta_direction() {
    let store = FleetStore::new();
    add_robot(&store, "RBT-001", RobotStatus::Active);

    let now = Utc::now();
    // Previous window: 1 of 2 samples up (50%)
    store
        .record_reading(reading_at(
            &store,
            "RBT-001",
            RobotStatus::Critical,
            now - Duration::minutes(100),
        ))
        .unwrap();
    store
        .record_reading(reading_at(
            &store,
            "RBT-001",
            RobotStatus::Active,
            now - Duration::minutes(80),
        ))
        .unwrap();
    // Current window: 2 of 2 samples up (100%)
    for minutes in [40, 20] {
        store
            .record_reading(reading_at(
                &store,
                "RBT-001",
                RobotStatus::Idle,
                now - Duration::minutes(minutes),
            ))
            .unwrap();
    }

    let stats = FleetAggregator::new(store)
        .compute_stats_at(TimeWindow::H1, now)
        .unwrap();

    assert_eq!(stats.uptime.current, 100.0);
    assert_eq!(stats.uptime.previous, 50.0);
    assert_eq!(stats.uptime.delta, 50.0);
    assert_eq!(stats.uptime.direction, TrendDirection::Up);
}

#[test]
fn energy_estimate_tracks_reading_volume() {
    let store = FleetStore::new();
    add_robot(&store, "RBT-001", RobotStatus::Active);
    store
        .update_robot("RBT-001", |r| {
            r.set_cpu_load(60.0);
            r.set_memory_usage(40.0);
        })
        .unwrap();

    let now = Utc::now();
    for minutes in 1..=12 {
        store
            .record_reading(reading_at(
                &store,
                "RBT-001",
                RobotStatus::Active,
                now - Duration::minutes(minutes * 4),
            ))
            .unwrap();
    }

    let stats = FleetAggregator::new(store)
        .compute_stats_at(TimeWindow::H1, now)
        .unwrap();

    // 12 samples = 2 blocks: 2 * (0.1 + 0.6*0.3 + 0.4*0.15)
    assert!((stats.energy_kwh.current - 0.68).abs() < 1e-9);
    assert!(stats.energy_kwh.current >= 0.0);
}

#[test]
fn group_breakdown_skips_empty_groups() {
    let store = FleetStore::new();
    store
        .add_group(RobotGroup::new("grp-a", "Hall A", GroupType::Location))
        .unwrap();
    store
        .add_group(RobotGroup::new("grp-b", "Hall B", GroupType::Location))
        .unwrap();

    add_robot(&store, "RBT-001", RobotStatus::Active);
    add_robot(&store, "RBT-002", RobotStatus::Critical);
    store.assign_group("RBT-001", Some("grp-a")).unwrap();
    store.assign_group("RBT-002", Some("grp-a")).unwrap();

    let engine = TransitionEngine::new(store.clone());
    engine
        .apply_status_change("RBT-002", RobotStatus::Active, RobotStatus::Critical)
        .unwrap();

    let stats = FleetAggregator::new(store)
        .compute_fleet_stats(TimeWindow::H24)
        .unwrap();

    // Hall B has no members and is skipped, not zero-filled
    assert_eq!(stats.groups.len(), 1);
    let group = &stats.groups[0];
    assert_eq!(group.name, "Hall A");
    assert_eq!(group.robot_count, 2);
    assert_eq!(group.active_count, 1);
    assert_eq!(group.critical_count, 1);
    assert_eq!(group.uptime_percent, 50.0);
    assert_eq!(group.open_alerts, 1);
    assert_eq!(stats.critical_alerts, 1);
}

#[test]
fn location_rollup_averages_snapshot_gauges() {
    let store = FleetStore::new();
    for (id, location, battery) in [
        ("RBT-001", "Dock", 80.0),
        ("RBT-002", "Dock", 60.0),
        ("RBT-003", "Yard", 50.0),
    ] {
        let mut robot = Robot::new(id, id, RobotType::Delivery);
        robot.location = location.to_string();
        robot.set_battery_level(battery);
        store.add_robot(robot).unwrap();
    }

    let stats = FleetAggregator::new(store)
        .compute_fleet_stats(TimeWindow::H24)
        .unwrap();

    assert_eq!(stats.locations.len(), 2);
    let dock = stats
        .locations
        .iter()
        .find(|l| l.location == "Dock")
        .unwrap();
    assert_eq!(dock.robot_count, 2);
    assert_eq!(dock.avg_battery, 70.0);
}

#[test]
fn report_generation_persists_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = FleetStore::new();
    add_robot(&store, "RBT-001", RobotStatus::Active);
    store
        .add_group(RobotGroup::new("grp-a", "Hall A", GroupType::Location))
        .unwrap();
    store.assign_group("RBT-001", Some("grp-a")).unwrap();

    let archive = ReportArchive::open(dir.path()).unwrap();
    let generator = ReportGenerator::new(
        store.clone(),
        FleetAggregator::new(store),
        archive.clone(),
    );

    let report = generator
        .generate(ReportType::Performance, TimeWindow::H24, None)
        .unwrap();
    assert!(report.title.contains("Performance"));
    assert_eq!(report.payload["total_robots"], 1);

    let recent = generator.recent(5);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].report_type, ReportType::Performance);

    let ts = report.generated_at.timestamp() as u64;
    generator.archive_report(ts).unwrap();
    assert!(archive.recent(1)[0].archived);
}

#[test]
fn group_scoped_report_retains_only_that_group() {
    let dir = tempfile::tempdir().unwrap();
    let store = FleetStore::new();
    store
        .add_group(RobotGroup::new("grp-a", "Hall A", GroupType::Location))
        .unwrap();
    store
        .add_group(RobotGroup::new("grp-b", "Hall B", GroupType::Location))
        .unwrap();
    add_robot(&store, "RBT-001", RobotStatus::Active);
    add_robot(&store, "RBT-002", RobotStatus::Idle);
    store.assign_group("RBT-001", Some("grp-a")).unwrap();
    store.assign_group("RBT-002", Some("grp-b")).unwrap();

    let archive = ReportArchive::open(dir.path()).unwrap();
    let generator = ReportGenerator::new(
        store.clone(),
        FleetAggregator::new(store),
        archive,
    );

    let report = generator
        .generate(ReportType::Daily, TimeWindow::H24, Some("grp-a"))
        .unwrap();
    assert_eq!(report.group_id.as_deref(), Some("grp-a"));
    let groups = report.payload["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "Hall A");
    assert!(report.title.contains("Hall A"));

    let err = generator
        .generate(ReportType::Daily, TimeWindow::H24, Some("grp-missing"))
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Store(StoreError::GroupNotFound(_))
    ));
}

#[test]
fn memberless_group_report_keeps_group_name_in_title() {
    let dir = tempfile::tempdir().unwrap();
    let store = FleetStore::new();
    store
        .add_group(RobotGroup::new("grp-idle", "Idle Hall", GroupType::Location))
        .unwrap();

    let generator = ReportGenerator::new(
        store.clone(),
        FleetAggregator::new(store),
        ReportArchive::open(dir.path()).unwrap(),
    );

    let report = generator
        .generate(ReportType::Daily, TimeWindow::H24, Some("grp-idle"))
        .unwrap();

    // The aggregator skips memberless groups, so the payload is empty, but
    // the title still names the group.
    assert!(report.title.contains("Idle Hall"));
    assert_eq!(report.group_id.as_deref(), Some("grp-idle"));
    assert!(report.payload["groups"].as_array().unwrap().is_empty());
}
