pub mod containers;
pub mod host;

use anyhow::Context;
use std::path::Path;
use tracing::info;

use crate::driver::{self, ReportKind};
use crate::output;
use crate::snapshot::store::SnapshotStore;
use crate::snapshot::Snapshot;
use crate::utils::logging;

/// One full run: capture, compare against the stored snapshot, persist report and snapshot.
pub fn run_collect(output_dir: &Path, boot_dir: &Path, debug: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory {}", output_dir.display()))?;
    logging::init(debug, Some(output_dir));

    info!("collecting container information");
    let resources = containers::collect_all().context("container discovery failed")?;

    info!("collecting host information");
    let host = host::collect(boot_dir);

    let current = Snapshot::new(host, resources);
    let store = SnapshotStore::in_dir(output_dir);
    let change_report = driver::run(&store, &current, chrono::Local::now());

    // 报告先落盘，再覆盖快照；报告写失败时保留旧快照，下次仍能对比
    output::write_change_log(output_dir, &change_report.text).context("writing change log")?;
    output::write_snapshot(output_dir, &current).context("saving snapshot")?;

    let kind = match change_report.kind {
        ReportKind::Baseline => "baseline",
        ReportKind::Comparison => "comparison",
    };
    info!(kind, containers = current.resource_count(), "run complete");

    println!("{}", change_report.text);
    Ok(())
}
