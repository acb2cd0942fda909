//! User, host, OS, kernel, uptime, shell, packages, and top processes.

use super::command::{env_var, read, run};
use crate::display::logo::DEFAULT_DISTRO;
use crate::models::{fields, InfoRecord, NOT_AVAILABLE};
use anyhow::Result;
use std::path::Path;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

const TOP_PROCESS_COUNT: usize = 5;

/// Collects the system section.
pub fn collect() -> Result<InfoRecord> {
    let mut info = InfoRecord::new();

    info.insert_or_na(fields::USER, env_var("USER").or_else(|| env_var("USERNAME")));
    info.insert_or_na(fields::HOST, System::host_name());
    info.insert_or_na(fields::OS, os_name());
    info.insert_or_na(fields::KERNEL, System::kernel_version());
    info.insert(fields::UPTIME, format_uptime(System::uptime()));
    info.insert_or_na(fields::SHELL, shell());
    info.insert_or_na(
        fields::TERMINAL,
        env_var("TERM").or_else(|| env_var("COLORTERM")),
    );

    let (package_key, package_count) = packages();
    info.insert(package_key, package_count);

    info.insert(fields::TOP_PROCESSES, top_processes());

    debug!("System collector produced {} fields", info.len());
    Ok(info)
}

fn os_name() -> Option<String> {
    read("/etc/os-release")
        .and_then(|content| parse_pretty_name(&content))
        .map(|name| rebrand(&name))
        .or_else(System::name)
}

/// Extracts `PRETTY_NAME` from os-release content.
pub fn parse_pretty_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|value| !value.is_empty())
}

/// Helwan Linux is Arch-based and ships Arch's os-release.
fn rebrand(os_name: &str) -> String {
    os_name.replace("Arch Linux", DEFAULT_DISTRO)
}

/// Formats seconds as `1d 2h 3m`, `2h 3m`, or `3m`.
pub fn format_uptime(seconds: u64) -> String {
    let minutes = (seconds / 60) % 60;
    let hours = (seconds / 3600) % 24;
    let days = seconds / 86_400;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

fn shell() -> Option<String> {
    env_var("SHELL").map(|path| {
        Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(path)
    })
}

/// Package managers in probe order: display name, command, arguments, and
/// header lines to discount.
const PACKAGE_MANAGERS: [(&str, &str, &[&str], usize); 3] = [
    ("Pacman", "pacman", &["-Qq"], 0),
    ("DPKG", "dpkg", &["-l"], 5),
    ("RPM", "rpm", &["-qa"], 0),
];

fn packages() -> (String, String) {
    for (name, program, args, header_lines) in PACKAGE_MANAGERS {
        let Some(output) = run(program, args) else {
            continue;
        };
        if let Some(count) = count_packages(&output, header_lines) {
            return (format!("{} ({})", fields::PACKAGES, name), count.to_string());
        }
    }
    (fields::PACKAGES.to_string(), NOT_AVAILABLE.to_string())
}

/// Counts listing lines minus a fixed header; `None` when the listing is empty.
pub fn count_packages(output: &str, header_lines: usize) -> Option<usize> {
    let lines = output.matches('\n').count();
    (lines > 0).then(|| lines.saturating_sub(header_lines))
}

fn top_processes() -> String {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_processes();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_processes();

    let total_memory = sys.total_memory();
    let samples = sys
        .processes()
        .values()
        .map(|process| {
            let memory_pct = if total_memory > 0 {
                process.memory() as f64 / total_memory as f64 * 100.0
            } else {
                0.0
            };
            ProcessSample {
                name: process.name().to_string(),
                cpu: process.cpu_usage() as f64,
                memory: memory_pct,
                is_thread: process.thread_kind().is_some(),
            }
        })
        .collect();

    format_top_processes(samples, TOP_PROCESS_COUNT)
}

/// One process reading used for the top-processes listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub name: String,
    pub cpu: f64,
    pub memory: f64,
    /// Linux reports threads alongside processes; these are skipped.
    pub is_thread: bool,
}

/// Drops thread entries, sorts by CPU (descending), and renders the first
/// `limit` entries, one per line.
pub fn format_top_processes(mut samples: Vec<ProcessSample>, limit: usize) -> String {
    samples.retain(|sample| !sample.is_thread);
    if samples.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    samples.sort_by(|a, b| b.cpu.total_cmp(&a.cpu));
    samples
        .iter()
        .take(limit)
        .map(|p| format!("{} ({:.1}% CPU, {:.1}% RAM)", p.name, p.cpu, p.memory))
        .collect::<Vec<_>>()
        .join("\n    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(125), "2m");
        assert_eq!(format_uptime(3 * 3600 + 7 * 60), "3h 7m");
        assert_eq!(format_uptime(2 * 86_400 + 5 * 3600 + 60 + 30), "2d 5h 1m");
        assert_eq!(format_uptime(86_400), "1d 0h 0m");
    }

    #[test]
    fn test_parse_pretty_name() {
        let content = "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\n";
        assert_eq!(parse_pretty_name(content), Some("Arch Linux".to_string()));
        assert_eq!(parse_pretty_name("ID=arch\n"), None);
        assert_eq!(parse_pretty_name("PRETTY_NAME=\"\"\n"), None);
    }

    #[test]
    fn test_rebrand() {
        assert_eq!(rebrand("Arch Linux"), "Helwan Linux");
        assert_eq!(rebrand("Ubuntu 24.04 LTS"), "Ubuntu 24.04 LTS");
    }

    #[test]
    fn test_count_packages() {
        assert_eq!(count_packages("a\nb\nc\n", 0), Some(3));
        assert_eq!(count_packages("h\nh\nh\nh\nh\nx\ny\n", 5), Some(2));
        assert_eq!(count_packages("h\nh\n", 5), Some(0));
        assert_eq!(count_packages("", 0), None);
    }

    #[test]
    fn test_format_top_processes() {
        let samples = (0..7)
            .map(|i| ProcessSample {
                name: format!("p{}", i),
                cpu: i as f64,
                memory: 1.0,
                is_thread: false,
            })
            .collect();

        let rendered = format_top_processes(samples, 5);
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "p6 (6.0% CPU, 1.0% RAM)");
        assert_eq!(lines[1].trim(), "p5 (5.0% CPU, 1.0% RAM)");
        assert!(lines[1].starts_with("    "));
    }

    #[test]
    fn test_format_top_processes_skips_threads() {
        let sample = |name: &str, cpu: f64, is_thread: bool| ProcessSample {
            name: name.to_string(),
            cpu,
            memory: 2.0,
            is_thread,
        };
        let samples = vec![
            sample("helfetch", 45.0, false),
            sample("helfetch-worker", 40.0, true),
            sample("firefox", 12.5, false),
        ];

        let rendered = format_top_processes(samples, 5);
        let lines: Vec<&str> = rendered.split('\n').map(str::trim).collect();

        assert_eq!(
            lines,
            vec!["helfetch (45.0% CPU, 2.0% RAM)", "firefox (12.5% CPU, 2.0% RAM)"]
        );
    }

    #[test]
    fn test_format_top_processes_only_threads() {
        let samples = vec![ProcessSample {
            name: "worker".to_string(),
            cpu: 1.0,
            memory: 1.0,
            is_thread: true,
        }];
        assert_eq!(format_top_processes(samples, 5), NOT_AVAILABLE);
    }

    #[test]
    fn test_format_top_processes_empty() {
        assert_eq!(format_top_processes(Vec::new(), 5), NOT_AVAILABLE);
    }
}
