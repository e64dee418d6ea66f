use super::probe::{CpuTicks, FsStats, MemoryPages, PowerSource, Probe, ProbeError};
use std::collections::VecDeque;

/// Scripted probe. `None` fields answer with `ProbeError::Unavailable`.
#[derive(Debug, Default)]
pub struct FakeProbe {
    pub ticks: VecDeque<Option<CpuTicks>>,
    pub brand: Option<String>,
    pub memory: Option<MemoryPages>,
    pub boot_time: Option<u64>,
    pub now: Option<u64>,
    pub fs: Option<FsStats>,
    pub power: Option<Vec<PowerSource>>,
    pub tick_reads: usize,
    pub mounts_queried: Vec<String>,
}

impl FakeProbe {
    /// A healthy host: 8 GB of 16 GB memory, 250 GB of 1 TB disk, one hour up.
    pub fn healthy() -> Self {
        Self {
            ticks: VecDeque::from([Some(CpuTicks {
                idle: 100,
                total: 1000,
            })]),
            brand: Some("Test CPU @ 3.00GHz".to_string()),
            memory: Some(MemoryPages {
                active: 1_500_000,
                wired: 500_000,
                inactive: 1_000_000,
                free: 1_000_000,
                page_size: 4000,
            }),
            boot_time: Some(1_700_000_000),
            now: Some(1_700_003_600),
            fs: Some(FsStats {
                blocks: 250_000_000,
                block_size: 4000,
                free_blocks: 187_500_000,
            }),
            power: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn with_ticks(mut self, ticks: impl IntoIterator<Item = Option<CpuTicks>>) -> Self {
        self.ticks = ticks.into_iter().collect();
        self
    }
}

impl Probe for FakeProbe {
    fn cpu_ticks(&mut self) -> Result<CpuTicks, ProbeError> {
        self.tick_reads += 1;
        self.ticks
            .pop_front()
            .flatten()
            .ok_or(ProbeError::Unavailable("cpu tick counters"))
    }

    fn cpu_brand(&mut self) -> Result<String, ProbeError> {
        self.brand
            .clone()
            .ok_or(ProbeError::Unavailable("cpu brand"))
    }

    fn memory_pages(&mut self) -> Result<MemoryPages, ProbeError> {
        self.memory
            .ok_or(ProbeError::Unavailable("memory statistics"))
    }

    fn boot_time(&mut self) -> Result<u64, ProbeError> {
        self.boot_time.ok_or(ProbeError::Unavailable("boot time"))
    }

    fn clock_now(&mut self) -> Result<u64, ProbeError> {
        self.now.ok_or(ProbeError::Unavailable("wall clock"))
    }

    fn fs_stats(&mut self, mount: &str) -> Result<FsStats, ProbeError> {
        self.mounts_queried.push(mount.to_string());
        self.fs
            .ok_or(ProbeError::Unavailable("filesystem statistics"))
    }

    fn power_sources(&mut self) -> Result<Vec<PowerSource>, ProbeError> {
        self.power
            .clone()
            .ok_or(ProbeError::Unavailable("power sources"))
    }
}
