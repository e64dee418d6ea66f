use std::time::Duration;
use thiserror::Error;

/// Built-in dashboard settings. The layout and refresh rate are fixed; the
/// struct exists so they are validated in one place and can be varied in tests.
#[derive(Debug, Clone)]
pub struct Config {
    pub refresh_interval: Duration,
    pub root_mount: String,
    pub title: String,
    pub bar_width: u16,
    pub window_rows: u16,
    pub window_cols: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(1000),
            root_mount: "/".to_string(),
            title: "SysInfo Dashboard".to_string(),
            bar_width: 30,
            window_rows: 25,
            window_cols: 85,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration is invalid: {0}")]
    Validation(String),
}

/// Rows the dashboard layout writes to, border excluded.
pub const LAYOUT_ROWS: u16 = 19;
/// Columns taken by a bar besides its cells: brackets plus " 100.0%".
pub const BAR_DECORATION_COLS: u16 = 9;
/// Column where the CPU usage bar starts.
pub const CPU_BAR_COL: u16 = 12;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::Validation(
                "refresh_interval must be greater than zero".to_string(),
            ));
        }
        if self.root_mount.trim().is_empty() {
            return Err(ConfigError::Validation(
                "root_mount must not be empty".to_string(),
            ));
        }
        if self.bar_width == 0 {
            return Err(ConfigError::Validation(
                "bar_width must be greater than zero".to_string(),
            ));
        }
        if self.window_rows < LAYOUT_ROWS + 1 {
            return Err(ConfigError::Validation(format!(
                "window_rows must be at least {} to fit the layout",
                LAYOUT_ROWS + 1
            )));
        }
        let needed_cols = u32::from(CPU_BAR_COL)
            + u32::from(self.bar_width)
            + u32::from(BAR_DECORATION_COLS)
            + 1;
        if u32::from(self.window_cols) < needed_cols {
            return Err(ConfigError::Validation(format!(
                "window_cols must be at least {needed_cols} for a {}-cell bar",
                self.bar_width
            )));
        }
        Ok(())
    }
}
