pub mod format;
pub mod terminal;

use crate::collectors::{Probe, StatsCollector, SysStats};
use crate::config::{Config, CPU_BAR_COL};
use format::{battery_label, format_time, progress_bar};
use std::io;
use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, trace};

pub use terminal::TerminalSurface;

/// Text-UI capabilities the dashboard draws with.
pub trait Surface {
    /// Returns one buffered keypress, if any, without waiting.
    fn poll_key(&mut self) -> io::Result<Option<char>>;
    fn erase(&mut self) -> io::Result<()>;
    fn draw_border(&mut self) -> io::Result<()>;
    fn put_str(&mut self, row: u16, col: u16, text: &str) -> io::Result<()>;
    /// Pushes everything drawn since the last refresh to the display.
    fn refresh(&mut self) -> io::Result<()>;
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

pub fn is_quit_key(key: char) -> bool {
    key.eq_ignore_ascii_case(&'q')
}

pub struct Dashboard<S: Surface, P: Probe> {
    surface: S,
    collector: StatsCollector<P>,
    cfg: Config,
    state: LoopState,
}

impl<S: Surface, P: Probe> Dashboard<S, P> {
    pub fn new(surface: S, collector: StatsCollector<P>, cfg: Config) -> Self {
        Self {
            surface,
            collector,
            cfg,
            state: LoopState::Running,
        }
    }

    /// Samples and redraws once per refresh interval until the quit key is
    /// read. Returns the number of frames drawn.
    pub async fn run(&mut self) -> Result<u64, DashboardError> {
        let mut ticker = time::interval(self.cfg.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut frames = 0_u64;

        while self.state == LoopState::Running {
            ticker.tick().await;

            if self.surface.poll_key()?.is_some_and(is_quit_key) {
                info!(frames, "quit key pressed");
                self.state = LoopState::Stopped;
                continue;
            }

            let stats = self.collector.collect();
            draw_dashboard(&mut self.surface, &stats, &self.cfg)?;
            frames += 1;
            trace!(frame = frames, cpu = stats.cpu_usage_percent, "frame drawn");
        }

        Ok(frames)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Tears down the collector and then the display.
    pub fn shutdown(self) -> io::Result<()> {
        self.collector.shutdown();
        self.surface.close()
    }

    #[cfg(test)]
    fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    fn collector(&self) -> &StatsCollector<P> {
        &self.collector
    }
}

pub fn draw_dashboard<S: Surface>(
    surface: &mut S,
    stats: &SysStats,
    cfg: &Config,
) -> io::Result<()> {
    surface.erase()?;
    surface.draw_border()?;
    surface.put_str(1, 2, &cfg.title)?;

    surface.put_str(3, 2, &format!("CPU: {}", stats.cpu_brand))?;
    surface.put_str(4, 4, "Usage: ")?;
    surface.put_str(
        4,
        CPU_BAR_COL,
        &progress_bar(stats.cpu_usage_percent, cfg.bar_width),
    )?;

    surface.put_str(6, 2, "Memory:")?;
    surface.put_str(
        7,
        4,
        &format!(
            "{:.2} GB used / {:.2} GB total",
            stats.memory_used_gb, stats.memory_total_gb
        ),
    )?;
    surface.put_str(8, 4, &progress_bar(stats.memory_percent, cfg.bar_width))?;

    surface.put_str(10, 2, "Disk:")?;
    surface.put_str(
        11,
        4,
        &format!(
            "{:.2} GB used / {:.2} GB total",
            stats.disk_used_gb, stats.disk_total_gb
        ),
    )?;
    surface.put_str(12, 4, &progress_bar(stats.disk_percent, cfg.bar_width))?;

    surface.put_str(
        14,
        2,
        &format!("Uptime: {}", format_time(stats.uptime_seconds)),
    )?;
    surface.put_str(
        16,
        2,
        &format!(
            "Battery: {}",
            battery_label(&stats.battery_status, stats.battery_percent)
        ),
    )?;
    surface.put_str(18, 2, "Press Q to quit.")?;

    surface.refresh()
}
