//! 快照对比：容器按名称分为 新增 / 删除 / 修改，修改项逐字段给出变化描述
//! 所有输出按名称排序，字段顺序固定，同样的两份快照总是得到同样的结果

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, warn};

use crate::snapshot::{HostInfo, ResourceRecord, Snapshot};

// ── 数据结构 ────────────────────────────────────────────────────────────────

/// A single field- or set-level difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    Field {
        field: &'static str,
        old: String,
        new: String,
    },
    Removed {
        field: &'static str,
        entries: Vec<String>,
    },
    Added {
        field: &'static str,
        entries: Vec<String>,
    },
    Count {
        field: &'static str,
        old: usize,
        new: usize,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Field { field, old, new } => write!(f, "{}: {} → {}", field, old, new),
            Change::Removed { field, entries } => {
                write!(f, "removed {}: {}", field, entries.join(", "))
            }
            Change::Added { field, entries } => {
                write!(f, "added {}: {}", field, entries.join(", "))
            }
            Change::Count { field, old, new } => write!(f, "{}: {} → {}", field, old, new),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDiff {
    pub name: String,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    pub previous_timestamp: DateTime<Utc>,
    pub added: Vec<ResourceRecord>,
    pub removed: Vec<ResourceRecord>,
    pub modified: Vec<ResourceDiff>,
    pub host_changes: Vec<Change>,
}

impl SnapshotDiff {
    pub fn resource_change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resource_change_count() == 0 && self.host_changes.is_empty()
    }
}

// ── 对比入口 ────────────────────────────────────────────────────────────────

pub fn compare(previous: &Snapshot, current: &Snapshot) -> SnapshotDiff {
    let old_by_name = index_by_name(&previous.resources, "previous");
    let new_by_name = index_by_name(&current.resources, "current");

    let added: Vec<ResourceRecord> = new_by_name
        .iter()
        .filter(|(name, _)| !old_by_name.contains_key(*name))
        .map(|(_, r)| (*r).clone())
        .collect();

    let removed: Vec<ResourceRecord> = old_by_name
        .iter()
        .filter(|(name, _)| !new_by_name.contains_key(*name))
        .map(|(_, r)| (*r).clone())
        .collect();

    let modified: Vec<ResourceDiff> = old_by_name
        .iter()
        .filter_map(|(name, old)| {
            let new = new_by_name.get(name)?;
            let changes = compare_resource(old, new);
            if changes.is_empty() {
                None
            } else {
                Some(ResourceDiff { name: name.to_string(), changes })
            }
        })
        .collect();

    let host_changes = compare_host(&previous.host, &current.host);

    debug!(
        added = added.len(),
        removed = removed.len(),
        modified = modified.len(),
        host = host_changes.len(),
        "snapshot comparison finished"
    );

    SnapshotDiff {
        previous_timestamp: previous.host.timestamp,
        added,
        removed,
        modified,
        host_changes,
    }
}

/// Field comparison for two records sharing a name; order here is the report order.
pub fn compare_resource(old: &ResourceRecord, new: &ResourceRecord) -> Vec<Change> {
    let mut changes = Vec::new();

    scalar(&mut changes, "image", &old.image, &new.image);
    scalar(&mut changes, "status", &old.status, &new.status);
    scalar(
        &mut changes,
        "restart policy",
        old.restart_policy_or_default(),
        new.restart_policy_or_default(),
    );

    set(&mut changes, "ports", &old.ports, &new.ports);
    set(&mut changes, "mounts", &old.mounts, &new.mounts);

    // 环境变量只比较个数，不看名称和值
    if old.environment_count != new.environment_count {
        changes.push(Change::Count {
            field: "environment variables",
            old: old.environment_count,
            new: new.environment_count,
        });
    }

    changes
}

/// Timestamp and tool version are metadata, not changes.
pub fn compare_host(old: &HostInfo, new: &HostInfo) -> Vec<Change> {
    let mut changes = Vec::new();
    scalar(&mut changes, "platform version", &old.platform_version, &new.platform_version);
    scalar(&mut changes, "hostname", &old.hostname, &new.hostname);
    scalar(&mut changes, "kernel version", &old.kernel_version, &new.kernel_version);
    changes
}

// ── 工具 ────────────────────────────────────────────────────────────────────

/// First record wins when a name repeats; later duplicates are reported and skipped.
fn index_by_name<'a>(
    resources: &'a [ResourceRecord],
    side: &str,
) -> BTreeMap<&'a str, &'a ResourceRecord> {
    let mut by_name = BTreeMap::new();
    for r in resources {
        match by_name.entry(r.name.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(r);
            }
            Entry::Occupied(_) => {
                warn!(
                    name = %r.name,
                    snapshot = side,
                    "duplicate resource name, keeping first occurrence"
                );
            }
        }
    }
    by_name
}

fn scalar(out: &mut Vec<Change>, field: &'static str, old: &str, new: &str) {
    if old != new {
        out.push(Change::Field {
            field,
            old: old.to_string(),
            new: new.to_string(),
        });
    }
}

fn set(
    out: &mut Vec<Change>,
    field: &'static str,
    old: &BTreeSet<String>,
    new: &BTreeSet<String>,
) {
    let gone: Vec<String> = old.difference(new).cloned().collect();
    if !gone.is_empty() {
        out.push(Change::Removed { field, entries: gone });
    }
    let fresh: Vec<String> = new.difference(old).cloned().collect();
    if !fresh.is_empty() {
        out.push(Change::Added { field, entries: fresh });
    }
}
