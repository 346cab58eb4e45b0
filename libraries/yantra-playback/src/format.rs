//! Clock formatting for track durations and positions
//!
//! Catalog records carry durations as `m:ss` strings and the mini player
//! renders positions the same way, so both directions live here.

use std::time::Duration;

/// Render seconds as `m:ss`, or `h:mm:ss` from one hour up.
///
/// Non-finite and negative values render as `0:00`; the device reports NaN
/// until metadata has loaded.
pub fn format_clock(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }

    let total = secs.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Parse an `m:ss` or `h:mm:ss` clock string.
///
/// Every field after the first must be below 60. Returns `None` for
/// anything else, including empty fields and signs.
pub fn parse_clock(text: &str) -> Option<Duration> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut fields = Vec::with_capacity(parts.len());
    for part in &parts {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        fields.push(part.parse::<u64>().ok()?);
    }

    if fields[1..].iter().any(|&f| f >= 60) {
        return None;
    }

    let secs = fields.iter().fold(0u64, |acc, &f| acc * 60 + f);
    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(9.7), "0:09");
        assert_eq!(format_clock(200.0), "3:20");
        assert_eq!(format_clock(3599.0), "59:59");
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_clock(3600.0), "1:00:00");
        assert_eq!(format_clock(3725.0), "1:02:05");
    }

    #[test]
    fn unusable_values_render_as_zero() {
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(f64::INFINITY), "0:00");
        assert_eq!(format_clock(-4.0), "0:00");
    }

    #[test]
    fn parses_catalog_durations() {
        assert_eq!(parse_clock("3:20"), Some(Duration::from_secs(200)));
        assert_eq!(parse_clock("5:55"), Some(Duration::from_secs(355)));
        assert_eq!(parse_clock(" 0:07 "), Some(Duration::from_secs(7)));
        assert_eq!(parse_clock("1:02:05"), Some(Duration::from_secs(3725)));
    }

    #[test]
    fn rejects_malformed_clocks() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("200"), None);
        assert_eq!(parse_clock("3:60"), None);
        assert_eq!(parse_clock("3:-1"), None);
        assert_eq!(parse_clock("a:bc"), None);
        assert_eq!(parse_clock("1:2:3:4"), None);
        assert_eq!(parse_clock(":30"), None);
    }
}
