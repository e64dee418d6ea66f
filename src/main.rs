mod collectors;
mod config;
mod dashboard;

use clap::Parser;
use collectors::{HostProbe, StatsCollector};
use config::Config;
use dashboard::{Dashboard, TerminalSurface};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sysdash")]
#[command(version, about = "Terminal dashboard for CPU, memory, disk, uptime and battery")]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let _cli = Cli::parse();

    let cfg = Config::default();
    if let Err(err) = cfg.validate() {
        error!(error = %err, "built-in configuration is invalid");
        std::process::exit(1);
    }

    info!(
        refresh = %humantime::format_duration(cfg.refresh_interval),
        root_mount = %cfg.root_mount,
        "starting sysdash"
    );

    let surface = match TerminalSurface::open(cfg.window_rows, cfg.window_cols) {
        Ok(surface) => surface,
        Err(err) => {
            error!(error = %err, "failed to set up the terminal");
            std::process::exit(1);
        }
    };
    let collector = StatsCollector::initialize(HostProbe::new(), cfg.root_mount.clone());

    let mut dashboard = Dashboard::new(surface, collector, cfg);
    let result = dashboard.run().await;
    let state = dashboard.state();
    let closed = dashboard.shutdown();

    let frames = match result {
        Ok(frames) => frames,
        Err(err) => {
            error!(error = %err, "dashboard stopped on a terminal error");
            std::process::exit(1);
        }
    };
    if let Err(err) = closed {
        error!(error = %err, "failed to restore the terminal");
        std::process::exit(1);
    }

    info!(frames, state = ?state, "sysdash stopped");
}

/// Logs go to stderr so they never interleave with the dashboard on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
