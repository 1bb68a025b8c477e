//! Fleet context rendering for advisor prompts
//!
//! Renders the current fleet snapshot (per-robot lines plus a summary block)
//! into plain text the completion API can reason over.

use std::fmt::Write as _;

use crate::store::{FleetStore, StoreError};
use crate::types::RobotStatus;

/// Render the fleet into prompt context.
///
/// Empty fleet renders a fixed line instead of an empty string so the model
/// is told explicitly that there is nothing to report on.
pub fn build_fleet_context(store: &FleetStore) -> Result<String, StoreError> {
    let mut robots = store.robots()?;
    if robots.is_empty() {
        return Ok("No robot data available.".to_string());
    }
    robots.sort_by(|a, b| a.robot_id.cmp(&b.robot_id));

    let mut out = String::from("Data for all robots:\n\n");

    for robot in &robots {
        let _ = writeln!(out, "Robot: {} (ID: {})", robot.name, robot.robot_id);
        let _ = writeln!(out, "- Status: {}", robot.status);
        let _ = writeln!(out, "- Type: {}", robot.robot_type);
        let _ = writeln!(out, "- Battery: {:.1}%", robot.battery_level);
        let _ = writeln!(out, "- Temperature: {:.1}°C", robot.temperature);
        let _ = writeln!(out, "- Location: {}", robot.location);
        let _ = writeln!(
            out,
            "- Current task: {}",
            robot.current_task.as_deref().unwrap_or("none")
        );

        if let Some(alert) = store.latest_unresolved_alert(&robot.robot_id)? {
            let _ = writeln!(
                out,
                "- Latest alert: {} ({})",
                alert.title, alert.alert_type
            );
            let _ = writeln!(out, "  Description: {}", alert.description);
            let _ = writeln!(
                out,
                "  Time: {}",
                alert.created_at.format("%Y-%m-%d %H:%M")
            );
        }

        out.push('\n');
    }

    let n = robots.len();
    let critical = robots
        .iter()
        .filter(|r| r.status == RobotStatus::Critical)
        .count();
    let warning = robots
        .iter()
        .filter(|r| r.status == RobotStatus::Warning)
        .count();
    let maintenance = robots
        .iter()
        .filter(|r| r.status == RobotStatus::Maintenance)
        .count();
    let avg_battery = robots.iter().map(|r| r.battery_level).sum::<f64>() / n as f64;
    let avg_temp = robots.iter().map(|r| r.temperature).sum::<f64>() / n as f64;

    out.push_str("Fleet summary:\n");
    let _ = writeln!(out, "- Total robots: {n}");
    let _ = writeln!(
        out,
        "- Operational: {}",
        n - critical - warning - maintenance
    );
    let _ = writeln!(out, "- Critical: {critical}");
    let _ = writeln!(out, "- Warning: {warning}");
    let _ = writeln!(out, "- In maintenance: {maintenance}");
    let _ = writeln!(out, "- Average battery: {avg_battery:.1}%");
    let _ = writeln!(out, "- Average temperature: {avg_temp:.1}°C");

    Ok(out)
}
