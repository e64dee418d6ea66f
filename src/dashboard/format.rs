use crate::collectors::BATTERY_PERCENT_UNAVAILABLE;

pub const BAR_FILL: char = '=';

/// `[====      ] 40.0%` with `floor(percent / 100 * width)` filled cells.
pub fn progress_bar(percent: f64, width: u16) -> String {
    let width = usize::from(width);
    let filled = if percent.is_finite() {
        ((percent / 100.0 * width as f64).floor().max(0.0) as usize).min(width)
    } else {
        0
    };

    let mut bar = String::with_capacity(width + 10);
    bar.push('[');
    bar.extend(std::iter::repeat(BAR_FILL).take(filled));
    bar.extend(std::iter::repeat(' ').take(width - filled));
    bar.push(']');
    bar.push_str(&format!(" {percent:.1}%"));
    bar
}

/// Zero-padded `HH:MM:SS`; hours keep counting past 24.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

pub fn battery_label(status: &str, percent: i32) -> String {
    if percent == BATTERY_PERCENT_UNAVAILABLE {
        format!("{status} (n/a)")
    } else {
        format!("{status} ({percent}%)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_bar_fills_half_the_cells() {
        let bar = progress_bar(50.0, 30);
        assert_eq!(bar, format!("[{}{}] 50.0%", "=".repeat(15), " ".repeat(15)));
    }

    #[test]
    fn bar_fill_rounds_down() {
        let bar = progress_bar(99.9, 30);
        assert_eq!(bar.matches(BAR_FILL).count(), 29);
        assert!(bar.ends_with("] 99.9%"));
    }

    #[test]
    fn bar_edges() {
        assert_eq!(progress_bar(0.0, 4), "[    ] 0.0%");
        assert_eq!(progress_bar(100.0, 4), "[====] 100.0%");
    }

    #[test]
    fn bar_never_overflows_its_width() {
        let over = progress_bar(150.0, 10);
        assert_eq!(over.matches(BAR_FILL).count(), 10);
        let under = progress_bar(-20.0, 10);
        assert_eq!(under.matches(BAR_FILL).count(), 0);
        let nan = progress_bar(f64::NAN, 10);
        assert!(nan.starts_with(&format!("[{}]", " ".repeat(10))));
    }

    #[test]
    fn time_is_zero_padded() {
        assert_eq!(format_time(3661.0), "01:01:01");
        assert_eq!(format_time(0.0), "00:00:00");
        assert_eq!(format_time(59.9), "00:00:59");
    }

    #[test]
    fn hours_are_not_wrapped_at_a_day() {
        assert_eq!(format_time(90000.0), "25:00:00");
        assert_eq!(format_time(360_000.0), "100:00:00");
    }

    #[test]
    fn negative_time_reads_as_zero() {
        assert_eq!(format_time(-5.0), "00:00:00");
    }

    #[test]
    fn battery_sentinel_is_shown_as_not_available() {
        assert_eq!(battery_label("Unknown", -1), "Unknown (n/a)");
        assert_eq!(battery_label("Charging", 80), "Charging (80%)");
    }
}
