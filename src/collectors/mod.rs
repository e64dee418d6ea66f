pub mod probe;
pub mod stats;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(test)]
pub mod fake;

pub use probe::{HostProbe, Probe};
pub use stats::StatsCollector;

/// Reported when the battery percentage cannot be determined.
pub const BATTERY_PERCENT_UNAVAILABLE: i32 = -1;

pub const UNKNOWN_LABEL: &str = "Unknown";

/// One sample of host resources, produced fresh on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SysStats {
    pub cpu_brand: String,
    pub cpu_usage_percent: f64,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
    pub memory_percent: f64,
    pub disk_used_gb: f64,
    pub disk_total_gb: f64,
    pub disk_percent: f64,
    pub uptime_seconds: f64,
    pub battery_status: String,
    pub battery_percent: i32,
}
