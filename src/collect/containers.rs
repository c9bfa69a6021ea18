//! 容器信息收集
//! 来源：docker ps / docker inspect；环境变量只计数，不读取值

use serde_json::Value;
use std::collections::BTreeSet;
use std::process::Command;
use tracing::{debug, warn};

use crate::snapshot::ResourceRecord;
use crate::utils::{GuardianError, Result};

// ── 公开接口 ────────────────────────────────────────────────────────────────

pub fn collect_all() -> Result<Vec<ResourceRecord>> {
    let ids = container_ids(&docker(&["ps", "-a", "--format", "{{.ID}}"])?);
    let mut records = Vec::with_capacity(ids.len());

    for id in &ids {
        match docker(&["inspect", id.as_str()]).and_then(|out| first_document(&out)) {
            Ok(json) => records.push(parse_inspect(&json)),
            Err(e) => warn!(container = %id, "skipping container: {}", e),
        }
    }

    debug!(found = ids.len(), collected = records.len(), "container discovery finished");
    Ok(records)
}

// ── docker CLI ──────────────────────────────────────────────────────────────

/// stdout of one docker CLI call; a non-zero exit is an error carrying stderr.
fn docker(args: &[&str]) -> Result<Vec<u8>> {
    let verb = args.first().copied().unwrap_or("docker");
    let out = Command::new("docker")
        .args(args)
        .output()
        .map_err(|e| GuardianError::Docker(format!("cannot run docker {}: {}", verb, e)))?;

    if !out.status.success() {
        return Err(GuardianError::Docker(format!(
            "docker {} exited with {}: {}",
            verb,
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(out.stdout)
}

fn container_ids(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// `docker inspect` prints an array even for a single container.
fn first_document(stdout: &[u8]) -> Result<Value> {
    let docs: Vec<Value> = serde_json::from_slice(stdout)?;
    docs.into_iter()
        .next()
        .ok_or_else(|| GuardianError::Parse("empty inspect result".to_string()))
}

// ── inspect 解析 ────────────────────────────────────────────────────────────

pub fn parse_inspect(c: &Value) -> ResourceRecord {
    let name = c["Name"].as_str().unwrap_or("").trim_start_matches('/');
    let image = str_or_unknown(&c["Config"]["Image"]);
    let status = str_or_unknown(&c["State"]["Status"]);

    let mut record = ResourceRecord::new(name, image, status);
    record.restart_policy = c["HostConfig"]["RestartPolicy"]["Name"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from);
    record.ports = parse_ports(c);
    record.mounts = parse_mounts(c);
    record.environment_count = c["Config"]["Env"].as_array().map(|a| a.len()).unwrap_or(0);
    record
}

/// "hostPort:containerPort/proto", first host binding of each published port.
fn parse_ports(c: &Value) -> BTreeSet<String> {
    let mut ports = BTreeSet::new();
    if let Some(published) = c["NetworkSettings"]["Ports"].as_object() {
        for (container_port, bindings) in published {
            let host_port = bindings
                .as_array()
                .and_then(|a| a.first())
                .and_then(|b| b["HostPort"].as_str());
            if let Some(hp) = host_port {
                ports.insert(format!("{}:{}", hp, container_port));
            }
        }
    }
    ports
}

/// Bind mounts only; named volumes live inside Docker's own storage.
fn parse_mounts(c: &Value) -> BTreeSet<String> {
    c["Mounts"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter(|m| m["Type"].as_str() == Some("bind"))
                .map(|m| {
                    format!(
                        "{}:{}",
                        m["Source"].as_str().unwrap_or(""),
                        m["Destination"].as_str().unwrap_or("")
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn str_or_unknown(v: &Value) -> String {
    v.as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(crate::snapshot::UNKNOWN)
        .to_string()
}
