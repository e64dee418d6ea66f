use super::probe::{CpuTicks, FsStats, MemoryPages, PowerSource, Probe, ProbeError};
use super::{SysStats, BATTERY_PERCENT_UNAVAILABLE, UNKNOWN_LABEL};
use tracing::debug;

const BYTES_PER_GB: f64 = 1e9;

/// Used/total pair in decimal gigabytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Usage {
    pub used_gb: f64,
    pub total_gb: f64,
    pub percent: f64,
}

/// Samples the host through a [`Probe`].
///
/// Holds the CPU tick reading from the previous sample so that every
/// [`collect`](Self::collect) reports usage over the interval since the last
/// call only.
pub struct StatsCollector<P: Probe> {
    probe: P,
    root_mount: String,
    baseline: Option<CpuTicks>,
}

impl<P: Probe> StatsCollector<P> {
    /// Takes the first CPU tick reading. If it fails, usage reads 0% until a
    /// later reading succeeds.
    pub fn initialize(mut probe: P, root_mount: impl Into<String>) -> Self {
        let baseline = or_fallback("cpu tick counters", probe.cpu_ticks().map(Some), None);
        let root_mount = root_mount.into();
        debug!(
            root_mount = %root_mount,
            has_baseline = baseline.is_some(),
            "stats collector initialized"
        );
        Self {
            probe,
            root_mount,
            baseline,
        }
    }

    /// Never fails: each query that cannot be answered degrades to zero,
    /// `"Unknown"` or the battery sentinel.
    pub fn collect(&mut self) -> SysStats {
        let cpu_brand = or_fallback(
            "cpu brand",
            self.probe.cpu_brand(),
            UNKNOWN_LABEL.to_string(),
        );
        let cpu_usage_percent = self.sample_cpu_usage();
        let memory = or_fallback(
            "memory statistics",
            self.probe.memory_pages().map(memory_usage),
            Usage::default(),
        );
        let uptime_seconds = or_fallback("uptime", self.read_uptime(), 0.0);
        let disk = or_fallback(
            "filesystem statistics",
            self.probe.fs_stats(&self.root_mount).map(disk_usage),
            Usage::default(),
        );
        let (battery_status, battery_percent) = or_fallback(
            "power sources",
            self.probe.power_sources().map(|s| battery_reading(&s)),
            unknown_battery(),
        );

        SysStats {
            cpu_brand,
            cpu_usage_percent,
            memory_used_gb: memory.used_gb,
            memory_total_gb: memory.total_gb,
            memory_percent: memory.percent,
            disk_used_gb: disk.used_gb,
            disk_total_gb: disk.total_gb,
            disk_percent: disk.percent,
            uptime_seconds,
            battery_status,
            battery_percent,
        }
    }

    pub fn shutdown(self) {
        debug!(root_mount = %self.root_mount, "stats collector shut down");
    }

    #[cfg(test)]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    fn sample_cpu_usage(&mut self) -> f64 {
        let current = or_fallback("cpu tick counters", self.probe.cpu_ticks().map(Some), None);
        let usage = match (self.baseline, current) {
            (Some(previous), Some(current)) => cpu_usage_percent(previous, current),
            _ => 0.0,
        };
        self.baseline = current;
        usage
    }

    fn read_uptime(&mut self) -> Result<f64, ProbeError> {
        let boot = self.probe.boot_time()?;
        let now = self.probe.clock_now()?;
        Ok(now.saturating_sub(boot) as f64)
    }
}

fn or_fallback<T>(what: &'static str, result: Result<T, ProbeError>, fallback: T) -> T {
    result.unwrap_or_else(|err| {
        debug!(what, error = %err, "instrumentation query failed, using fallback");
        fallback
    })
}

pub fn cpu_usage_percent(previous: CpuTicks, current: CpuTicks) -> f64 {
    let delta_total = current.total.saturating_sub(previous.total);
    if delta_total == 0 {
        return 0.0;
    }
    let delta_idle = current.idle.saturating_sub(previous.idle);
    ((1.0 - delta_idle as f64 / delta_total as f64) * 100.0).clamp(0.0, 100.0)
}

pub fn memory_usage(pages: MemoryPages) -> Usage {
    let used_pages = pages.active.saturating_add(pages.wired);
    let free_pages = pages.free.saturating_add(pages.inactive);
    let total_pages = used_pages.saturating_add(free_pages);
    usage_from_bytes(
        used_pages.saturating_mul(pages.page_size),
        total_pages.saturating_mul(pages.page_size),
    )
}

pub fn disk_usage(stats: FsStats) -> Usage {
    let total = stats.blocks.saturating_mul(stats.block_size);
    let free = stats.free_blocks.saturating_mul(stats.block_size);
    usage_from_bytes(total.saturating_sub(free), total)
}

fn usage_from_bytes(used_bytes: u64, total_bytes: u64) -> Usage {
    let used_gb = used_bytes as f64 / BYTES_PER_GB;
    let total_gb = total_bytes as f64 / BYTES_PER_GB;
    let percent = if total_bytes > 0 {
        used_bytes as f64 / total_bytes as f64 * 100.0
    } else {
        0.0
    };
    Usage {
        used_gb,
        total_gb,
        percent,
    }
}

/// Status label and percentage of the primary power source.
pub fn battery_reading(sources: &[PowerSource]) -> (String, i32) {
    let Some(primary) = sources.first() else {
        return unknown_battery();
    };
    let Some(desc) = primary.description.as_ref() else {
        debug!(source = %primary.name, "primary power source has no description");
        return unknown_battery();
    };

    let status = match desc.state.trim() {
        "" => UNKNOWN_LABEL.to_string(),
        state => state.to_string(),
    };
    let percent = if desc.max_capacity == 0 {
        BATTERY_PERCENT_UNAVAILABLE
    } else {
        // Truncates toward zero.
        let ratio = desc.current_capacity as f64 / desc.max_capacity as f64;
        (ratio * 100.0).clamp(0.0, 100.0) as i32
    };
    (status, percent)
}

fn unknown_battery() -> (String, i32) {
    (UNKNOWN_LABEL.to_string(), BATTERY_PERCENT_UNAVAILABLE)
}
