//! Performance recommendations derived from collected facts.
//!
//! Each rule reads one field by name and contributes at most one piece of
//! advice. Missing fields, the `N/A` sentinel, and unparsable values are
//! skipped silently.

use crate::models::{fields, InfoRecord, Recommendation};

pub const RAM_VERY_HIGH: &str = "RAM usage is very high. Consider closing unnecessary applications or upgrading your RAM for better performance.";
pub const RAM_HIGH: &str =
    "RAM usage is high. You might experience performance slowdowns with many open applications.";
pub const CPU_EXTREME: &str = "CPU usage is extremely high. Your system might be struggling with current tasks. Check running processes.";
pub const CPU_HIGH: &str = "CPU usage is consistently high. This could indicate a demanding application or background process.";
pub const DISK_CRITICAL: &str =
    "Disk space is critically low. Freeing up space can improve system responsiveness.";
pub const DISK_LOW: &str = "Disk space is running low. Consider archiving or deleting old files.";
pub const OPTIMAL: &str = "Your system appears to be running optimally. Keep up the good work!";

/// Oldest kernel major version that is not flagged as outdated.
const MIN_KERNEL_MAJOR: u32 = 5;

/// A two-tier threshold rule over a percentage field.
struct UsageRule {
    field: &'static str,
    /// Strictly above this fires the severe advice.
    severe_above: f64,
    severe: &'static str,
    /// At or above this (and not severe) fires the warning.
    warn_from: f64,
    warning: &'static str,
}

const USAGE_RULES: [UsageRule; 3] = [
    UsageRule {
        field: fields::RAM_USAGE,
        severe_above: 85.0,
        severe: RAM_VERY_HIGH,
        warn_from: 70.0,
        warning: RAM_HIGH,
    },
    UsageRule {
        field: fields::CPU_USAGE,
        severe_above: 90.0,
        severe: CPU_EXTREME,
        warn_from: 75.0,
        warning: CPU_HIGH,
    },
    UsageRule {
        field: fields::DISK,
        severe_above: 90.0,
        severe: DISK_CRITICAL,
        warn_from: 80.0,
        warning: DISK_LOW,
    },
];

impl UsageRule {
    fn evaluate(&self, record: &InfoRecord) -> Option<&'static str> {
        let pct = record.known(self.field).and_then(parse_percent)?;
        if pct > self.severe_above {
            Some(self.severe)
        } else if pct >= self.warn_from {
            Some(self.warning)
        } else {
            None
        }
    }
}

/// Parses `"92.5%"` (or `"92.5"`) into a number.
pub fn parse_percent(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Leading numeric major version, e.g. `4` for `"4.15.0-20-generic"` or
/// `"Linux 4.19"`.
pub fn kernel_major(kernel: &str) -> Option<u32> {
    let start = kernel.find(|c: char| c.is_ascii_digit())?;
    let digits: String = kernel[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// True when the string names a Linux kernel: it mentions "linux" or has
/// the `MAJOR.MINOR.PATCH[-suffix]` release shape `uname -r` prints.
fn is_linux_kernel(kernel: &str) -> bool {
    if kernel.to_lowercase().contains("linux") {
        return true;
    }
    let release = kernel.split(['-', '+', ' ']).next().unwrap_or("");
    let parts: Vec<&str> = release.split('.').collect();
    parts.len() >= 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn kernel_advice(record: &InfoRecord) -> Option<Recommendation> {
    let kernel = record.known(fields::KERNEL)?;
    if !is_linux_kernel(kernel) {
        return None;
    }
    let major = kernel_major(kernel)?;
    (major < MIN_KERNEL_MAJOR).then(|| {
        format!(
            "Your kernel version ({}) might be outdated. Consider updating for better performance, security, and hardware compatibility.",
            kernel
        )
    })
}

/// Produces recommendations in rule order. Never returns an empty list.
pub fn recommend(record: &InfoRecord) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = USAGE_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(record))
        .map(String::from)
        .collect();

    recommendations.extend(kernel_advice(record));

    if recommendations.is_empty() {
        recommendations.push(OPTIMAL.to_string());
    }

    recommendations
}
