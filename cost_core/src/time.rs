//! # Print Time Text
//!
//! Durations are typed by users as `HH:MM` (one to three hour digits, two
//! minute digits, minutes 00-59). The engine works in fractional hours.
//!
//! [`hhmm_to_hours`] is lenient: anything malformed becomes zero so a
//! half-edited form never blocks a calculation. Use [`parse_hhmm`] at an
//! input-validation boundary that should reject bad text instead.
//!
//! ```rust
//! use cost_core::time::{hhmm_to_hours, format_hours_hhmm};
//!
//! assert_eq!(hhmm_to_hours("03:30").0, 3.5);
//! assert_eq!(hhmm_to_hours("abc").0, 0.0);
//! assert_eq!(format_hours_hhmm(3.5), "03:30");
//! ```

use crate::errors::{CalcError, CalcResult};
use crate::units::Hours;

/// Convert `HH:MM` text to fractional hours, returning zero for malformed text.
pub fn hhmm_to_hours(text: &str) -> Hours {
    parse_hhmm(text).unwrap_or_default()
}

/// Strictly parse `HH:MM` text into fractional hours.
pub fn parse_hhmm(text: &str) -> CalcResult<Hours> {
    let invalid = |reason: &str| CalcError::invalid_input("time", text, reason);

    let (hours, minutes) = text
        .split_once(':')
        .ok_or_else(|| invalid("Expected HH:MM"))?;

    if hours.is_empty() || hours.len() > 3 || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("Hours must be 1 to 3 digits"));
    }
    if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("Minutes must be exactly 2 digits"));
    }

    let hours: u32 = hours.parse().map_err(|_| invalid("Hours must be 1 to 3 digits"))?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid("Minutes must be exactly 2 digits"))?;
    if minutes > 59 {
        return Err(invalid("Minutes must be between 00 and 59"));
    }

    Ok(Hours(f64::from(hours) + f64::from(minutes) / 60.0))
}

/// Format fractional hours back to `HH:MM`, rounding to the nearest minute.
pub fn format_hours_hhmm(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "00:00".to_string();
    }
    let total_minutes = (hours * 60.0).round() as u64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_hour() {
        assert_eq!(hhmm_to_hours("03:30").0, 3.5);
    }

    #[test]
    fn test_zero() {
        assert_eq!(hhmm_to_hours("00:00").0, 0.0);
    }

    #[test]
    fn test_malformed_is_zero() {
        assert_eq!(hhmm_to_hours("abc").0, 0.0);
        assert_eq!(hhmm_to_hours("").0, 0.0);
        assert_eq!(hhmm_to_hours("3:5").0, 0.0);
        assert_eq!(hhmm_to_hours("1234:00").0, 0.0);
        assert_eq!(hhmm_to_hours("-1:30").0, 0.0);
    }

    #[test]
    fn test_three_digit_hours() {
        assert_eq!(hhmm_to_hours("120:15").0, 120.25);
    }

    #[test]
    fn test_strict_rejects_bad_minutes() {
        let err = parse_hhmm("02:75").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(hhmm_to_hours("02:75").0, 0.0);
    }

    #[test]
    fn test_surrounding_whitespace_is_malformed() {
        assert!(parse_hhmm(" 1:45 ").is_err());
        assert_eq!(hhmm_to_hours(" 1:45 ").0, 0.0);
        assert_eq!(hhmm_to_hours("1:45\n").0, 0.0);
        assert_eq!(hhmm_to_hours("1:45").0, 1.75);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_hours_hhmm(0.0), "00:00");
        assert_eq!(format_hours_hhmm(2.25), "02:15");
        assert_eq!(format_hours_hhmm(100.5), "100:30");
        assert_eq!(format_hours_hhmm(f64::NAN), "00:00");
    }
}
