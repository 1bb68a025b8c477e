//! Report generation
//!
//! On-demand snapshots of aggregator output, persisted to the report
//! archive. A report freezes the statistics record at generation time;
//! regenerating later reflects whatever the fleet looks like then.

use chrono::Utc;
use tracing::info;

use crate::aggregation::{FleetAggregator, TimeWindow};
use crate::store::{FleetStore, ReportArchive, ReportStoreError, StoreError};
use crate::types::{Report, ReportType};

/// Error type for report generation
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Archive(#[from] ReportStoreError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Generates and persists report snapshots.
#[derive(Clone)]
pub struct ReportGenerator {
    store: FleetStore,
    aggregator: FleetAggregator,
    archive: ReportArchive,
}

impl ReportGenerator {
    pub fn new(store: FleetStore, aggregator: FleetAggregator, archive: ReportArchive) -> Self {
        Self {
            store,
            aggregator,
            archive,
        }
    }

    /// Generate a report for the window, optionally scoped to one group,
    /// and persist it to the archive.
    pub fn generate(
        &self,
        report_type: ReportType,
        window: TimeWindow,
        group_id: Option<&str>,
    ) -> Result<Report, ReportError> {
        let mut stats = self.aggregator.compute_fleet_stats(window)?;

        // The group name comes from the store, not the retained stats: a
        // memberless group is skipped by the aggregator but still titles
        // its report.
        let mut group_name = None;
        if let Some(gid) = group_id {
            let group = self
                .store
                .group(gid)?
                .ok_or_else(|| StoreError::GroupNotFound(gid.to_string()))?;
            group_name = Some(group.name);
            stats.groups.retain(|g| g.group_id == gid);
        }

        let title = match group_name {
            Some(group_name) => format!("{report_type} report: {group_name} ({window})"),
            None => format!("{report_type} report ({window})"),
        };

        let report = Report {
            title,
            report_type,
            window,
            group_id: group_id.map(str::to_string),
            generated_at: Utc::now(),
            payload: serde_json::to_value(&stats)?,
            archived: false,
        };

        self.archive.store(&report)?;
        info!(title = %report.title, window = %window, "report generated");
        Ok(report)
    }

    /// The most recent N persisted reports, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Report> {
        self.archive.recent(limit)
    }

    /// Flag a persisted report as archived by its generation timestamp
    /// (unix seconds).
    pub fn archive_report(&self, ts: u64) -> Result<(), ReportError> {
        self.archive.archive(ts)?;
        Ok(())
    }
}
