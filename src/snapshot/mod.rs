//! 快照模型：一次采集得到的宿主机身份 + 容器资源列表
//! 快照构造后只读，diff 引擎从不修改输入

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const UNKNOWN: &str = "unknown";
pub const NOT_AVAILABLE: &str = "N/A";

// ── 数据结构 ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub host: HostInfo,
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub timestamp: DateTime<Utc>,
    #[serde(default = "unknown")]
    pub hostname: String,
    #[serde(default = "unknown")]
    pub platform_version: String,
    #[serde(default = "unknown")]
    pub kernel_version: String,
    #[serde(default = "unknown")]
    pub guardian_version: String,
}

/// One observed container. `name` is the identity key within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default = "unknown")]
    pub image: String,
    #[serde(default = "unknown")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
    /// "hostPort:containerPort/proto" tokens
    #[serde(default)]
    pub ports: BTreeSet<String>,
    /// "source:destination" tokens
    #[serde(default, alias = "volumes")]
    pub mounts: BTreeSet<String>,
    /// Only the count is kept; variable names and values never enter a snapshot.
    #[serde(default)]
    pub environment_count: usize,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

// ── 构造 / 访问 ─────────────────────────────────────────────────────────────

impl Snapshot {
    pub fn new(host: HostInfo, resources: Vec<ResourceRecord>) -> Self {
        Self { host, resources }
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl HostInfo {
    /// Host identity stamped with the running tool's version and the current time.
    pub fn capture(
        hostname: impl Into<String>,
        platform_version: impl Into<String>,
        kernel_version: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            hostname: hostname.into(),
            platform_version: platform_version.into(),
            kernel_version: kernel_version.into(),
            guardian_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, image: impl Into<String>, status: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() { unknown() } else { name },
            image: image.into(),
            status: status.into(),
            restart_policy: None,
            ports: BTreeSet::new(),
            mounts: BTreeSet::new(),
            environment_count: 0,
        }
    }

    pub fn restart_policy_or_default(&self) -> &str {
        self.restart_policy.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}
