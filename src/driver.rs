//! Run driver: previous snapshot -> diff -> report text.
//! Nothing is written here; the caller persists both the report and the new snapshot.

use chrono::{DateTime, Local};
use tracing::info;

use crate::diff;
use crate::report;
use crate::snapshot::store::SnapshotSource;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Baseline,
    Comparison,
}

#[derive(Debug, Clone)]
pub struct ChangeReport {
    pub kind: ReportKind,
    pub text: String,
}

pub fn run(
    source: &impl SnapshotSource,
    current: &Snapshot,
    generated_at: DateTime<Local>,
) -> ChangeReport {
    match source.load_previous() {
        None => {
            info!(
                resources = current.resource_count(),
                "no previous snapshot, writing baseline report"
            );
            ChangeReport {
                kind: ReportKind::Baseline,
                text: report::render_baseline(current, generated_at),
            }
        }
        Some(previous) => {
            let d = diff::compare(&previous, current);
            if d.is_empty() {
                info!("no changes since previous snapshot");
            } else {
                info!(
                    resource_changes = d.resource_change_count(),
                    host_changes = d.host_changes.len(),
                    "compared against previous snapshot"
                );
            }
            ChangeReport {
                kind: ReportKind::Comparison,
                text: report::render_comparison(&d, generated_at),
            }
        }
    }
}
