//! 变更报告渲染：首次运行输出基线报告，之后输出对比报告
//! 纯文本拼装，不做 I/O；除 "生成时间" 外，同样的输入得到同样的字节

use chrono::{DateTime, Local, Utc};

use crate::diff::SnapshotDiff;
use crate::snapshot::Snapshot;

pub const BASELINE_TITLE: &str = "# Config Guardian - Change Log";
pub const COMPARISON_TITLE: &str = "# Config Guardian - Configuration Changes";
pub const NO_RESOURCE_CHANGES: &str = "No container changes detected";
pub const RESOURCES_UNCHANGED: &str = "All containers remain unchanged since the previous snapshot.";
pub const NO_HOST_CHANGES: &str = "No host changes detected";
pub const FOOTER: &str = "*Generated by Config Guardian*";

pub fn render_baseline(current: &Snapshot, generated_at: DateTime<Local>) -> String {
    let h = &current.host;
    let count = current.resource_count();

    let lines = vec![
        BASELINE_TITLE.to_string(),
        String::new(),
        format!("## Initial Baseline - {}", fmt_local(generated_at)),
        String::new(),
        format!("**Server:** {}", h.hostname),
        format!("**Platform:** {}", h.platform_version),
        format!("**Captured:** {}", fmt_utc(h.timestamp)),
        format!("**Containers:** {}", count),
        String::new(),
        "This is the first captured baseline for this host. Future runs will show changes".to_string(),
        "compared to this baseline.".to_string(),
        String::new(),
        "### Summary".to_string(),
        "- Initial configuration captured".to_string(),
        format!("- {} containers documented", count),
        "- Host information recorded".to_string(),
        String::new(),
        "---".to_string(),
        FOOTER.to_string(),
        String::new(),
    ];

    lines.join("\n")
}

pub fn render_comparison(diff: &SnapshotDiff, generated_at: DateTime<Local>) -> String {
    let mut lines = vec![
        COMPARISON_TITLE.to_string(),
        format!("Generated: {}", fmt_local(generated_at)),
        format!("Previous snapshot: {}", fmt_utc(diff.previous_timestamp)),
        String::new(),
        "## Summary".to_string(),
        String::new(),
    ];

    // ── 容器变化 ──────────────────────────────────────────────────────────
    let total = diff.resource_change_count();
    if total == 0 {
        lines.push(NO_RESOURCE_CHANGES.to_string());
        lines.push(String::new());
        lines.push(RESOURCES_UNCHANGED.to_string());
        lines.push(String::new());
    } else {
        lines.push(format!("{} container changes detected", total));
        lines.push(String::new());

        if !diff.added.is_empty() {
            lines.push("### New Containers".to_string());
            for r in &diff.added {
                lines.push(format!("+ {} (image: {})", r.name, r.image));
            }
            lines.push(String::new());
        }

        if !diff.removed.is_empty() {
            lines.push("### Removed Containers".to_string());
            for r in &diff.removed {
                lines.push(format!("- {} (image: {})", r.name, r.image));
            }
            lines.push(String::new());
        }

        if !diff.modified.is_empty() {
            lines.push("### Modified Containers".to_string());
            for m in &diff.modified {
                lines.push(format!("~ {}:", m.name));
                for change in &m.changes {
                    lines.push(format!("    {}", change));
                }
            }
            lines.push(String::new());
        }
    }

    // ── 宿主机变化 ────────────────────────────────────────────────────────
    lines.push("## Host Changes".to_string());
    lines.push(String::new());
    if diff.host_changes.is_empty() {
        lines.push(NO_HOST_CHANGES.to_string());
    } else {
        for change in &diff.host_changes {
            lines.push(change.to_string());
        }
    }
    lines.push(String::new());

    lines.push("---".to_string());
    lines.push(FOOTER.to_string());
    lines.push(String::new());

    lines.join("\n")
}

fn fmt_local(t: DateTime<Local>) -> String {
    t.format("%Y-%m-%d %H:%M:%S %z").to_string()
}

fn fmt_utc(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use crate::snapshot::{HostInfo, ResourceRecord};
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, h, 0, 0).unwrap()
    }

    fn snapshot(hostname: &str, resources: Vec<ResourceRecord>) -> Snapshot {
        Snapshot::new(
            HostInfo {
                timestamp: "2024-05-31T22:15:00Z".parse().unwrap(),
                hostname: hostname.to_string(),
                platform_version: "6.12.4".to_string(),
                kernel_version: "6.1.64".to_string(),
                guardian_version: "0.1.0".to_string(),
            },
            resources,
        )
    }

    /// Report without the "Generated:" line, which is the only render-time field.
    fn body(report: &str) -> String {
        report
            .lines()
            .filter(|l| !l.starts_with("Generated:"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_baseline_report() {
        let snap = snapshot(
            "srv1",
            vec![
                ResourceRecord::new("a", "a:1", "running"),
                ResourceRecord::new("b", "b:1", "running"),
                ResourceRecord::new("c", "c:1", "exited"),
            ],
        );
        let report = render_baseline(&snap, at(9));

        assert!(report.starts_with(BASELINE_TITLE));
        assert!(report.contains("Initial Baseline"));
        assert!(report.contains("**Containers:** 3"));
        assert!(report.contains("srv1"));
        assert!(report.contains("2024-05-31 22:15:00 UTC"));
        assert!(!report.contains("Modified"));
        assert!(!report.contains("Removed"));
        assert_eq!(report, render_baseline(&snap, at(9)));
    }

    #[test]
    fn test_no_changes_report() {
        let snap = snapshot("srv1", vec![ResourceRecord::new("a", "a:1", "running")]);
        let report = render_comparison(&compare(&snap, &snap), at(10));

        let notice = format!("{}\n\n{}\n", NO_RESOURCE_CHANGES, RESOURCES_UNCHANGED);
        assert!(report.contains(&notice));
        assert!(report.contains(NO_HOST_CHANGES));
        assert!(report.contains("Previous snapshot: 2024-05-31 22:15:00 UTC"));
        assert!(!report.contains("### "));
        assert!(report.trim_end().ends_with(FOOTER));
    }

    #[test]
    fn test_comparison_sections() {
        let mut plex = ResourceRecord::new("plex", "plex:1", "running");
        plex.environment_count = 3;
        let prev = snapshot("srv1", vec![plex.clone(), ResourceRecord::new("old", "old:1", "exited")]);

        let mut plex2 = plex.clone();
        plex2.image = "plex:2".to_string();
        plex2.environment_count = 5;
        let cur = snapshot("srv2", vec![plex2, ResourceRecord::new("new", "new:1", "running")]);

        let report = render_comparison(&compare(&prev, &cur), at(10));
        let expected = "\
## Summary

3 container changes detected

### New Containers
+ new (image: new:1)

### Removed Containers
- old (image: old:1)

### Modified Containers
~ plex:
    image: plex:1 → plex:2
    environment variables: 3 → 5

## Host Changes

hostname: srv1 → srv2

---
*Generated by Config Guardian*
";
        assert!(report.ends_with(expected), "unexpected report:\n{}", report);
    }

    #[test]
    fn test_generation_time_carries_utc_offset() {
        let generated = at(10);
        let offset = generated.format("%z").to_string();
        let snap = snapshot("srv1", vec![]);

        let report = render_comparison(&compare(&snap, &snap), generated);
        let line = report.lines().find(|l| l.starts_with("Generated:")).unwrap();
        assert_eq!(line, format!("Generated: 2024-06-01 10:00:00 {}", offset));

        let baseline = render_baseline(&snap, generated);
        let heading = format!("## Initial Baseline - 2024-06-01 10:00:00 {}", offset);
        assert!(baseline.contains(&heading));
    }

    #[test]
    fn test_sections_only_when_non_empty() {
        let prev = snapshot("srv1", vec![]);
        let cur = snapshot("srv1", vec![ResourceRecord::new("web", "nginx", "running")]);
        let report = render_comparison(&compare(&prev, &cur), at(10));

        assert!(report.contains("1 container changes detected"));
        assert!(report.contains("### New Containers"));
        assert!(!report.contains("### Removed Containers"));
        assert!(!report.contains("### Modified Containers"));
    }

    #[test]
    fn test_report_deterministic_across_input_order() {
        let prev = snapshot(
            "srv1",
            vec![
                ResourceRecord::new("b", "b:1", "running"),
                ResourceRecord::new("a", "a:1", "running"),
            ],
        );
        let cur_one = snapshot(
            "srv1",
            vec![
                ResourceRecord::new("c", "c:1", "running"),
                ResourceRecord::new("a", "a:2", "running"),
                ResourceRecord::new("d", "d:1", "running"),
            ],
        );
        let mut cur_two = cur_one.clone();
        cur_two.resources.reverse();
        let mut prev_rev = prev.clone();
        prev_rev.resources.reverse();

        let one = render_comparison(&compare(&prev, &cur_one), at(10));
        let two = render_comparison(&compare(&prev_rev, &cur_two), at(11));
        assert_ne!(one, two);
        assert_eq!(body(&one), body(&two));
    }

    #[test]
    fn test_env_values_never_rendered() {
        let mut old = ResourceRecord::new("app", "app:1", "running");
        old.environment_count = 3;
        let mut new = old.clone();
        new.environment_count = 5;
        let report = render_comparison(
            &compare(&snapshot("h", vec![old]), &snapshot("h", vec![new])),
            at(10),
        );
        let env_lines: Vec<&str> = report.lines().filter(|l| l.contains("environment")).collect();
        assert_eq!(env_lines, vec!["    environment variables: 3 → 5"]);
    }
}
