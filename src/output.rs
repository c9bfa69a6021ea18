//! 输出层：报告与快照的落盘，以及 diff 子命令的 text / json 渲染

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::diff::{self, SnapshotDiff};
use crate::report;
use crate::snapshot::store::{self, SNAPSHOT_FILE};
use crate::snapshot::Snapshot;
use crate::utils::{GuardianError, Result};

pub const CHANGE_LOG_FILE: &str = "changes.log";

// ── 落盘 ────────────────────────────────────────────────────────────────────

pub fn write_change_log(dir: &Path, text: &str) -> Result<PathBuf> {
    let path = dir.join(CHANGE_LOG_FILE);
    write_atomic(&path, text.as_bytes())?;
    info!(path = %path.display(), "change log written");
    Ok(path)
}

/// Becomes the "previous" side of the next run.
pub fn write_snapshot(dir: &Path, snapshot: &Snapshot) -> Result<PathBuf> {
    let path = dir.join(SNAPSHOT_FILE);
    let json = serde_json::to_string_pretty(snapshot)?;
    write_atomic(&path, json.as_bytes())?;
    info!(path = %path.display(), resources = snapshot.resource_count(), "snapshot saved");
    Ok(path)
}

// 先写临时文件再 rename，读者不会看到写了一半的文档
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ── diff 子命令输出 ─────────────────────────────────────────────────────────

pub fn render_diff(diff: &SnapshotDiff, format: &str) -> Result<String> {
    match format {
        "json" => serde_json::to_string_pretty(diff)
            .map_err(|e| GuardianError::System(format!("JSON serialize: {}", e))),
        "text" => Ok(report::render_comparison(diff, chrono::Local::now())),
        other => Err(GuardianError::System(format!("unknown format: {}", other))),
    }
}

/// Offline comparison of two snapshot documents; both must exist and parse.
pub fn run_diff(previous: &Path, current: &Path, format: &str) -> Result<()> {
    let old = store::load_file(previous)?;
    let new = store::load_file(current)?;
    println!("{}", render_diff(&diff::compare(&old, &new), format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use crate::snapshot::store::{SnapshotSource, SnapshotStore};
    use crate::snapshot::{HostInfo, ResourceRecord};

    fn snap() -> Snapshot {
        let mut r = ResourceRecord::new("plex", "plex:1", "running");
        r.ports.insert("32400:32400/tcp".to_string());
        Snapshot::new(HostInfo::capture("srv1", "6.12.4", "6.1.64"), vec![r])
    }

    #[test]
    fn test_saved_snapshot_is_next_previous() {
        let dir = tempfile::tempdir().unwrap();
        let s = snap();
        write_snapshot(dir.path(), &s).unwrap();

        assert_eq!(SnapshotStore::in_dir(dir.path()).load_previous(), Some(s));
        assert!(!dir.path().join("guardian-snapshot.tmp").exists());
    }

    #[test]
    fn test_change_log_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        write_change_log(dir.path(), "first").unwrap();
        let path = write_change_log(dir.path(), "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_render_diff_formats() {
        let s = snap();
        let d = compare(&s, &s);

        let json = render_diff(&d, "json").unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["added"].as_array().unwrap().len(), 0);
        assert!(v["previous_timestamp"].is_string());

        assert!(render_diff(&d, "text").unwrap().contains(report::NO_HOST_CHANGES));
        assert!(matches!(render_diff(&d, "yaml"), Err(GuardianError::System(_))));
    }

    #[test]
    fn test_run_diff_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(dir.path(), &snap()).unwrap();
        assert!(run_diff(&path, &path, "text").is_ok());
        assert!(run_diff(&path, &dir.path().join("missing.json"), "text").is_err());
    }

    #[test]
    fn test_json_change_shape() {
        let old = snap();
        let mut new = old.clone();
        new.resources[0].status = "exited".to_string();

        let json = render_diff(&compare(&old, &new), "json").unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let change = &v["modified"][0]["changes"][0];
        assert_eq!(change["kind"], "field");
        assert_eq!(change["field"], "status");
        assert_eq!(change["old"], "running");
        assert_eq!(change["new"], "exited");
    }
}
