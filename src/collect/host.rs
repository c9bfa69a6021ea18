//! 宿主机身份收集
//! 来源：<boot>/config/ident.cfg, <boot>/version, /proc/sys/kernel/*

use std::fs;
use std::path::Path;

use crate::snapshot::{HostInfo, UNKNOWN};

const PROC_HOSTNAME: &str = "/proc/sys/kernel/hostname";
const PROC_OSRELEASE: &str = "/proc/sys/kernel/osrelease";

pub fn collect(boot_dir: &Path) -> HostInfo {
    HostInfo::capture(
        hostname(boot_dir, Path::new(PROC_HOSTNAME)),
        platform_version(boot_dir),
        first_line(Path::new(PROC_OSRELEASE)).unwrap_or_else(|| UNKNOWN.to_string()),
    )
}

// ── hostname ────────────────────────────────────────────────────────────────

fn hostname(boot_dir: &Path, proc_hostname: &Path) -> String {
    // 优先使用 ident.cfg 中配置的服务器名，容器内的 hostname 往往是容器 ID
    ident_name(&boot_dir.join("config").join("ident.cfg"))
        .or_else(|| first_line(proc_hostname))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn ident_name(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()?
        .lines()
        .find(|l| l.starts_with("NAME="))
        .map(|l| l.trim_start_matches("NAME=").trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
}

// ── platform version ────────────────────────────────────────────────────────

fn platform_version(boot_dir: &Path) -> String {
    [boot_dir.join("version"), boot_dir.join("config").join("version")]
        .iter()
        .find_map(|p| first_line(p))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

// ── 工具 ────────────────────────────────────────────────────────────────────

fn first_line(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()?
        .lines()
        .next()
        .map(|l| l.trim().to_string())
        .filter(|s| !s.is_empty())
}
