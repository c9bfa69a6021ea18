//! 上一次快照的读取：文件不存在 = 首次运行；文件损坏 = 告警后按首次运行处理
//! 这里只读不写，当前快照由调用方持久化（见 output.rs）

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::snapshot::Snapshot;
use crate::utils::{GuardianError, Result};

pub const SNAPSHOT_FILE: &str = "guardian-snapshot.json";

/// Anything that can hand the Run Driver the previous snapshot.
pub trait SnapshotSource {
    fn load_previous(&self) -> Option<Snapshot>;
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store backed by the well-known snapshot file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(SNAPSHOT_FILE) }
    }

    fn read(&self) -> Result<Option<Snapshot>> {
        match load_file(&self.path) {
            Ok(snap) => Ok(Some(snap)),
            Err(GuardianError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Strict load of a snapshot document: missing or malformed files are errors.
pub fn load_file(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl SnapshotSource for SnapshotStore {
    fn load_previous(&self) -> Option<Snapshot> {
        match self.read() {
            Ok(Some(snap)) => {
                debug!(
                    path = %self.path.display(),
                    resources = snap.resource_count(),
                    "loaded previous snapshot"
                );
                Some(snap)
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "no previous snapshot");
                None
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "could not read previous snapshot, treating as first run: {}",
                    e
                );
                None
            }
        }
    }
}

impl SnapshotSource for Option<Snapshot> {
    fn load_previous(&self) -> Option<Snapshot> {
        self.clone()
    }
}
