//! CPU, memory, disk, GPU, and battery facts.

use super::command::{mebibytes, read, read_trimmed, run};
use crate::models::{fields, InfoRecord};
use anyhow::Result;
use std::path::Path;
use sysinfo::{Components, Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const SECTOR_SIZE: u64 = 512;
const THERMAL_ROOT: &str = "/sys/class/thermal";
const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Collects the hardware section.
pub fn collect() -> Result<InfoRecord> {
    let mut info = InfoRecord::new();
    let mut sys = System::new();

    info.insert_or_na(fields::CPU, cpu_model(&mut sys));
    info.insert_or_na(fields::CPU_USAGE, cpu_usage(&mut sys));
    info.insert_or_na(fields::CPU_TEMP, cpu_temperature());

    sys.refresh_memory();
    let (ram, ram_pct) = memory(sys.used_memory(), sys.total_memory()).unzip();
    info.insert_or_na(fields::RAM, ram);
    info.insert_or_na(fields::RAM_USAGE, ram_pct);

    info.insert_or_na(fields::DISK, root_disk_usage());
    info.insert_or_na(
        fields::DISK_IO,
        read("/proc/diskstats").and_then(|content| {
            parse_diskstats(&content, |dev| Path::new("/sys/block").join(dev).exists())
        }),
    );
    info.insert_or_na(
        fields::GPU,
        run("lspci", &["-k"]).and_then(|out| parse_lspci(&out)),
    );
    info.insert_or_na(fields::BATTERY, battery());

    debug!("Hardware collector produced {} fields", info.len());
    Ok(info)
}

fn cpu_model(sys: &mut System) -> Option<String> {
    read("/proc/cpuinfo")
        .and_then(|content| parse_cpu_model(&content))
        .or_else(|| {
            sys.refresh_cpu();
            sys.cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
        })
}

/// Extracts the first `model name` entry from `/proc/cpuinfo`.
pub fn parse_cpu_model(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "model name")
            .then(|| value.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

fn cpu_usage(sys: &mut System) -> Option<String> {
    sys.refresh_cpu();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu();

    if sys.cpus().is_empty() {
        return None;
    }
    Some(format!("{:.1}%", sys.global_cpu_info().cpu_usage()))
}

fn cpu_temperature() -> Option<String> {
    let components = Components::new_with_refreshed_list();
    let from_sensors = components
        .list()
        .iter()
        .map(|c| c.temperature())
        .find(|t| t.is_finite() && *t > 0.0)
        .map(|t| format!("{:.1}°C", t));

    from_sensors.or_else(thermal_zone_temperature)
}

fn thermal_zone_temperature() -> Option<String> {
    let mut zones: Vec<_> = std::fs::read_dir(THERMAL_ROOT)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("thermal_zone"))
        .map(|entry| entry.path())
        .collect();
    zones.sort();

    zones
        .iter()
        .find_map(|zone| read_trimmed(zone.join("temp")))
        .and_then(|raw| parse_millidegrees(&raw))
}

/// Converts a sysfs millidegree reading to `"45.0°C"`.
pub fn parse_millidegrees(raw: &str) -> Option<String> {
    let milli: i64 = raw.trim().parse().ok()?;
    Some(format!("{:.1}°C", milli as f64 / 1000.0))
}

/// Formats used/total bytes as `("4.0Gi/15.5Gi", "25.8%")`.
pub fn memory(used: u64, total: u64) -> Option<(String, String)> {
    if total == 0 {
        return None;
    }
    let ram = format!("{:.1}Gi/{:.1}Gi", used as f64 / GIB, total as f64 / GIB);
    let pct = format!("{:.1}%", used as f64 / total as f64 * 100.0);
    Some((ram, pct))
}

fn root_disk_usage() -> Option<String> {
    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))?;
    disk_usage_percent(root.total_space(), root.available_space())
}

/// Percentage of a filesystem in use, as `"27%"`.
pub fn disk_usage_percent(total: u64, available: u64) -> Option<String> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(format!("{:.0}%", used as f64 / total as f64 * 100.0))
}

/// Sums sectors read/written over whole block devices in
/// `/proc/diskstats` content. `is_whole_disk` filters out partitions.
pub fn parse_diskstats<F>(content: &str, is_whole_disk: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let mut read_sectors = 0u64;
    let mut written_sectors = 0u64;
    let mut seen = false;

    for line in content.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 10 {
            continue;
        }
        let device = cols[2];
        if device.starts_with("loop") || device.starts_with("ram") || !is_whole_disk(device) {
            continue;
        }
        let (Ok(read), Ok(written)) = (cols[5].parse::<u64>(), cols[9].parse::<u64>()) else {
            continue;
        };
        read_sectors += read;
        written_sectors += written;
        seen = true;
    }

    seen.then(|| {
        format!(
            "R:{}, W:{}",
            mebibytes(read_sectors * SECTOR_SIZE),
            mebibytes(written_sectors * SECTOR_SIZE)
        )
    })
}

/// Extracts display controllers from `lspci -k` output.
pub fn parse_lspci(output: &str) -> Option<String> {
    let gpus: Vec<String> = output
        .lines()
        .filter(|line| {
            line.contains("VGA compatible controller") || line.contains("3D controller")
        })
        .filter_map(|line| line.splitn(3, ':').last())
        .map(|desc| desc.trim().to_string())
        .filter(|desc| !desc.is_empty())
        .collect();

    (!gpus.is_empty()).then(|| gpus.join(", "))
}

/// Raw battery readings from sysfs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatteryReading {
    pub capacity: f64,
    pub status: String,
    /// Remaining energy (µWh) or charge (µAh).
    pub remaining: Option<f64>,
    /// Draw in µW or µA, matching `remaining`.
    pub draw: Option<f64>,
}

fn battery() -> Option<String> {
    let mut supplies: Vec<_> = std::fs::read_dir(POWER_SUPPLY_ROOT)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("BAT"))
        .map(|entry| entry.path())
        .collect();
    supplies.sort();

    let dir = supplies.first()?;
    let number = |name: &str| read_trimmed(dir.join(name)).and_then(|v| v.parse::<f64>().ok());

    let reading = BatteryReading {
        capacity: number("capacity")?,
        status: read_trimmed(dir.join("status")).unwrap_or_default(),
        remaining: number("energy_now").or_else(|| number("charge_now")),
        draw: number("power_now").or_else(|| number("current_now")),
    };
    Some(format_battery(&reading))
}

/// Renders a battery reading as `"80% (Discharging, Est. 3h 45m)"`.
pub fn format_battery(reading: &BatteryReading) -> String {
    let discharging = reading.status.eq_ignore_ascii_case("discharging");
    let (state, time_left) = if discharging {
        let estimate = match (reading.remaining, reading.draw) {
            (Some(remaining), Some(draw)) if draw > 0.0 => {
                let minutes_total = (remaining / draw * 60.0) as u64;
                format!("Est. {}h {}m", minutes_total / 60, minutes_total % 60)
            }
            _ => crate::models::NOT_AVAILABLE.to_string(),
        };
        ("Discharging", estimate)
    } else {
        ("Charging", "Full".to_string())
    };

    format!("{:.0}% ({}, {})", reading.capacity, state, time_left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_model() {
        let content = "processor\t: 0\nvendor_id\t: GenuineIntel\nmodel name\t: Intel(R) Core(TM) i7-10700K CPU @ 3.80GHz\n";
        assert_eq!(
            parse_cpu_model(content),
            Some("Intel(R) Core(TM) i7-10700K CPU @ 3.80GHz".to_string())
        );
        assert_eq!(parse_cpu_model("processor : 0\n"), None);
    }

    #[test]
    fn test_parse_millidegrees() {
        assert_eq!(parse_millidegrees("55000\n"), Some("55.0°C".to_string()));
        assert_eq!(parse_millidegrees("abc"), None);
    }

    #[test]
    fn test_memory() {
        let (ram, pct) = memory(4 * 1024 * 1024 * 1024, 16 * 1024 * 1024 * 1024).unwrap();
        assert_eq!(ram, "4.0Gi/16.0Gi");
        assert_eq!(pct, "25.0%");
        assert!(memory(0, 0).is_none());
    }

    #[test]
    fn test_disk_usage_percent() {
        assert_eq!(disk_usage_percent(100, 73), Some("27%".to_string()));
        assert_eq!(disk_usage_percent(0, 0), None);
    }

    #[test]
    fn test_parse_diskstats() {
        let content = "\
   7       0 loop0 100 0 2048 0 0 0 0 0 0 0 0
   8       0 sda 5000 10 204800 300 4000 20 102400 500 0 700 800
   8       1 sda1 4000 10 204800 300 4000 20 102400 500 0 700 800
 259       0 nvme0n1 1 0 2048 0 1 0 2048 0 0 0 0
";
        let result = parse_diskstats(content, |dev| dev == "sda" || dev == "nvme0n1").unwrap();
        // sda: 204800 + 2048 sectors read, 102400 + 2048 written
        assert_eq!(result, "R:101.0MB, W:51.0MB");

        assert!(parse_diskstats("", |_| true).is_none());
    }

    #[test]
    fn test_parse_lspci() {
        let output = "\
00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 630
\tKernel driver in use: i915
01:00.0 3D controller: NVIDIA Corporation GA104M [GeForce RTX 3070 Mobile]
00:1f.3 Audio device: Intel Corporation Cannon Lake PCH cAVS
";
        assert_eq!(
            parse_lspci(output),
            Some(
                "Intel Corporation UHD Graphics 630, NVIDIA Corporation GA104M [GeForce RTX 3070 Mobile]"
                    .to_string()
            )
        );
        assert_eq!(parse_lspci("00:1f.3 Audio device: x\n"), None);
    }

    #[test]
    fn test_format_battery() {
        let charging = BatteryReading {
            capacity: 80.0,
            status: "Charging".to_string(),
            ..Default::default()
        };
        assert_eq!(format_battery(&charging), "80% (Charging, Full)");

        let discharging = BatteryReading {
            capacity: 55.0,
            status: "Discharging".to_string(),
            remaining: Some(30_000_000.0),
            draw: Some(8_000_000.0),
        };
        assert_eq!(format_battery(&discharging), "55% (Discharging, Est. 3h 45m)");

        let unknown = BatteryReading {
            capacity: 40.0,
            status: "Discharging".to_string(),
            remaining: Some(1.0),
            draw: Some(0.0),
        };
        assert_eq!(format_battery(&unknown), "40% (Discharging, N/A)");
    }
}
