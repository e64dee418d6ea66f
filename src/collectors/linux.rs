use super::probe::{CpuTicks, MemoryPages, PowerDescription, PowerSource, ProbeError};
use super::UNKNOWN_LABEL;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";
const PROC_STAT: &str = "/proc/stat";
const PROC_MEMINFO: &str = "/proc/meminfo";
/// `/proc/meminfo` reports kB.
const MEMINFO_UNIT_BYTES: u64 = 1024;

pub fn read_cpu_ticks() -> Result<CpuTicks, ProbeError> {
    parse_cpu_ticks(&read_file(Path::new(PROC_STAT))?)
}

pub fn read_memory_pages() -> Result<MemoryPages, ProbeError> {
    parse_memory_pages(&read_file(Path::new(PROC_MEMINFO))?)
}

pub fn read_power_sources(root: &Path) -> Result<Vec<PowerSource>, ProbeError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ProbeError::Io {
                what: root.display().to_string(),
                source,
            })
        }
    };

    let mut dirs: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    dirs.sort();

    Ok(dirs
        .iter()
        .filter(|dir| is_battery(dir))
        .map(|dir| PowerSource {
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            description: read_power_description(dir),
        })
        .collect())
}

fn parse_cpu_ticks(text: &str) -> Result<CpuTicks, ProbeError> {
    let line = text
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ProbeError::Parse {
            what: PROC_STAT,
            detail: "missing aggregate cpu line".to_string(),
        })?;

    let fields = line
        .split_whitespace()
        .skip(1)
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ProbeError::Parse {
            what: PROC_STAT,
            detail: err.to_string(),
        })?;
    if fields.len() < 4 {
        return Err(ProbeError::Parse {
            what: PROC_STAT,
            detail: format!("expected at least 4 cpu columns, got {}", fields.len()),
        });
    }

    // user nice system idle iowait irq softirq steal; guest time is already
    // counted in user/nice.
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    let total = fields.iter().take(8).sum();
    Ok(CpuTicks { idle, total })
}

fn parse_memory_pages(text: &str) -> Result<MemoryPages, ProbeError> {
    let values: HashMap<&str, u64> = text
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let value = rest.split_whitespace().next()?.parse::<u64>().ok()?;
            Some((key.trim(), value))
        })
        .collect();

    let field = |key: &str| {
        values.get(key).copied().ok_or_else(|| ProbeError::Parse {
            what: PROC_MEMINFO,
            detail: format!("missing {key}"),
        })
    };

    Ok(MemoryPages {
        active: field("Active")?,
        wired: values.get("Unevictable").copied().unwrap_or(0),
        inactive: field("Inactive")?,
        free: field("MemFree")?,
        page_size: MEMINFO_UNIT_BYTES,
    })
}

fn is_battery(dir: &Path) -> bool {
    matches!(
        read_trimmed(&dir.join("type")).as_deref(),
        Some("Battery") | Some("UPS")
    )
}

fn read_power_description(dir: &Path) -> Option<PowerDescription> {
    let (current_capacity, max_capacity) = read_capacity_pair(dir, "energy_now", "energy_full")
        .or_else(|| read_capacity_pair(dir, "charge_now", "charge_full"))
        .or_else(|| read_u64(&dir.join("capacity")).map(|pct| (pct, 100)))?;
    let state = read_trimmed(&dir.join("status"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
    Some(PowerDescription {
        state,
        current_capacity,
        max_capacity,
    })
}

fn read_capacity_pair(dir: &Path, now: &str, full: &str) -> Option<(u64, u64)> {
    Some((read_u64(&dir.join(now))?, read_u64(&dir.join(full))?))
}

fn read_u64(path: &Path) -> Option<u64> {
    read_trimmed(path)?.parse().ok()
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_file(path: &Path) -> Result<String, ProbeError> {
    fs::read_to_string(path).map_err(|source| ProbeError::Io {
        what: path.display().to_string(),
        source,
    })
}
