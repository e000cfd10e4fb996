//! Clock-style time formatting for region bounds and playback positions.

/// Format seconds as `mm:ss:mmm`.
///
/// Minutes are not wrapped at an hour boundary (a 90 minute position renders as
/// `90:00:000`), matching how the on-screen timer behaves. Non-finite or
/// negative input formats as `00:00:000`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00:000".to_owned();
    }

    // Floor, not round: the display should never run ahead of the playhead.
    let total_ms = (seconds * 1000.0).floor() as u64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let m = total_s / 60;

    format!("{m:02}:{s:02}:{ms:03}")
}

/// Format a time interval as `mm:ss:mmm - mm:ss:mmm`.
pub fn format_interval(start: f64, end: f64) -> String {
    format!("{} - {}", format_clock(start), format_clock(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_clock(0.0), "00:00:000");
    }

    #[test]
    fn formats_minutes_seconds_millis() {
        assert_eq!(format_clock(62.5), "01:02:500");
        assert_eq!(format_clock(12.345), "00:12:345");
    }

    #[test]
    fn minutes_do_not_wrap_at_an_hour() {
        assert_eq!(format_clock(5400.0), "90:00:000");
    }

    #[test]
    fn floors_sub_millisecond_remainders() {
        assert_eq!(format_clock(1.9999), "00:01:999");
    }

    #[test]
    fn degenerate_input_formats_as_zero() {
        assert_eq!(format_clock(-3.0), "00:00:000");
        assert_eq!(format_clock(f64::NAN), "00:00:000");
        assert_eq!(format_clock(f64::INFINITY), "00:00:000");
    }

    #[test]
    fn interval_joins_both_ends() {
        assert_eq!(format_interval(12.5, 17.0), "00:12:500 - 00:17:000");
    }
}
