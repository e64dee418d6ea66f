use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{CpuExt, System, SystemExt};
use thiserror::Error;

#[cfg(target_os = "linux")]
use super::linux;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0} is unavailable on this host")]
    Unavailable(&'static str),
    #[error("failed to read {what}: {source}")]
    Io {
        what: String,
        source: std::io::Error,
    },
    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },
}

/// Cumulative CPU time counters. `total` covers every state category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub idle: u64,
    pub total: u64,
}

/// Virtual memory page counts plus the size of one page in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryPages {
    pub active: u64,
    pub wired: u64,
    pub inactive: u64,
    pub free: u64,
    pub page_size: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStats {
    pub blocks: u64,
    pub block_size: u64,
    pub free_blocks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSource {
    pub name: String,
    /// `None` when the source is listed but its details cannot be read.
    pub description: Option<PowerDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerDescription {
    pub state: String,
    pub current_capacity: u64,
    pub max_capacity: u64,
}

/// OS instrumentation the stats collector reads from.
///
/// Every query is fallible; callers decide what a failure degrades to.
pub trait Probe {
    fn cpu_ticks(&mut self) -> Result<CpuTicks, ProbeError>;
    fn cpu_brand(&mut self) -> Result<String, ProbeError>;
    fn memory_pages(&mut self) -> Result<MemoryPages, ProbeError>;
    /// Boot time as unix seconds.
    fn boot_time(&mut self) -> Result<u64, ProbeError>;
    /// Current wall time as unix seconds.
    fn clock_now(&mut self) -> Result<u64, ProbeError>;
    fn fs_stats(&mut self, mount: &str) -> Result<FsStats, ProbeError>;
    /// Power sources with the primary one first.
    fn power_sources(&mut self) -> Result<Vec<PowerSource>, ProbeError>;
}

/// Reads the local machine through procfs/sysfs, `statvfs` and `sysinfo`.
pub struct HostProbe {
    system: System,
}

impl HostProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for HostProbe {
    #[cfg(target_os = "linux")]
    fn cpu_ticks(&mut self) -> Result<CpuTicks, ProbeError> {
        linux::read_cpu_ticks()
    }

    #[cfg(not(target_os = "linux"))]
    fn cpu_ticks(&mut self) -> Result<CpuTicks, ProbeError> {
        Err(ProbeError::Unavailable("cpu tick counters"))
    }

    fn cpu_brand(&mut self) -> Result<String, ProbeError> {
        self.system.refresh_cpu();
        self.system
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .ok_or(ProbeError::Unavailable("cpu brand"))
    }

    #[cfg(target_os = "linux")]
    fn memory_pages(&mut self) -> Result<MemoryPages, ProbeError> {
        linux::read_memory_pages()
    }

    #[cfg(not(target_os = "linux"))]
    fn memory_pages(&mut self) -> Result<MemoryPages, ProbeError> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(ProbeError::Unavailable("memory statistics"));
        }
        let used = self.system.used_memory().min(total);
        Ok(MemoryPages {
            active: used,
            wired: 0,
            inactive: 0,
            free: total - used,
            page_size: 1,
        })
    }

    fn boot_time(&mut self) -> Result<u64, ProbeError> {
        match self.system.boot_time() {
            0 => Err(ProbeError::Unavailable("boot time")),
            secs => Ok(secs),
        }
    }

    fn clock_now(&mut self) -> Result<u64, ProbeError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|_| ProbeError::Unavailable("wall clock"))
    }

    #[cfg(unix)]
    #[allow(clippy::unnecessary_cast)]
    fn fs_stats(&mut self, mount: &str) -> Result<FsStats, ProbeError> {
        let stat = nix::sys::statvfs::statvfs(mount).map_err(|errno| ProbeError::Io {
            what: format!("filesystem statistics for {mount}"),
            source: errno.into(),
        })?;
        Ok(FsStats {
            blocks: stat.blocks() as u64,
            block_size: stat.fragment_size() as u64,
            free_blocks: stat.blocks_free() as u64,
        })
    }

    #[cfg(not(unix))]
    fn fs_stats(&mut self, mount: &str) -> Result<FsStats, ProbeError> {
        use sysinfo::DiskExt;

        self.system.refresh_disks_list();
        let disk = self
            .system
            .disks()
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new(mount))
            .ok_or(ProbeError::Unavailable("filesystem statistics"))?;
        Ok(FsStats {
            blocks: disk.total_space(),
            block_size: 1,
            free_blocks: disk.available_space(),
        })
    }

    #[cfg(target_os = "linux")]
    fn power_sources(&mut self) -> Result<Vec<PowerSource>, ProbeError> {
        linux::read_power_sources(std::path::Path::new(linux::POWER_SUPPLY_ROOT))
    }

    #[cfg(not(target_os = "linux"))]
    fn power_sources(&mut self) -> Result<Vec<PowerSource>, ProbeError> {
        Ok(Vec::new())
    }
}
