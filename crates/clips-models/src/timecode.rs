//! Timecode parsing and formatting for manual range entry.
//!
//! The trim stage shows `m:ss` fields for the range edges; edits come
//! back as free text and are applied only when they parse. Accepted
//! forms: `SS`, `MM:SS`, `HH:MM:SS`, each with optional fractions.

use thiserror::Error;

/// Timecode parse errors.
#[derive(Debug, Error, PartialEq)]
pub enum TimecodeError {
    #[error("Empty timecode")]
    Empty,

    #[error("Invalid timecode format: {0}")]
    InvalidFormat(String),

    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("Timecode must not be negative")]
    Negative,
}

/// Parse a timecode string to total seconds.
///
/// # Examples
/// ```
/// use clips_models::timecode::parse_timecode;
/// assert_eq!(parse_timecode("1:30").unwrap(), 90.0);
/// assert_eq!(parse_timecode("0:05").unwrap(), 5.0);
/// assert_eq!(parse_timecode("90").unwrap(), 90.0);
/// ```
pub fn parse_timecode(text: &str) -> Result<f64, TimecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TimecodeError::Empty);
    }

    let parts: Vec<&str> = text.split(':').collect();
    match parts.len() {
        1 => {
            let seconds: f64 = parts[0]
                .parse()
                .map_err(|_| TimecodeError::InvalidValue("seconds", parts[0].to_string()))?;
            if seconds < 0.0 {
                return Err(TimecodeError::Negative);
            }
            Ok(seconds)
        }
        2 => {
            let minutes: f64 = parts[0]
                .parse()
                .map_err(|_| TimecodeError::InvalidValue("minutes", parts[0].to_string()))?;
            let seconds: f64 = parts[1]
                .parse()
                .map_err(|_| TimecodeError::InvalidValue("seconds", parts[1].to_string()))?;
            if minutes < 0.0 || seconds < 0.0 {
                return Err(TimecodeError::Negative);
            }
            Ok(minutes * 60.0 + seconds)
        }
        3 => {
            let hours: f64 = parts[0]
                .parse()
                .map_err(|_| TimecodeError::InvalidValue("hours", parts[0].to_string()))?;
            let minutes: f64 = parts[1]
                .parse()
                .map_err(|_| TimecodeError::InvalidValue("minutes", parts[1].to_string()))?;
            let seconds: f64 = parts[2]
                .parse()
                .map_err(|_| TimecodeError::InvalidValue("seconds", parts[2].to_string()))?;
            if hours < 0.0 || minutes < 0.0 || seconds < 0.0 {
                return Err(TimecodeError::Negative);
            }
            Ok(hours * 3600.0 + minutes * 60.0 + seconds)
        }
        _ => Err(TimecodeError::InvalidFormat(text.to_string())),
    }
}

/// Format seconds as the `m:ss` display form used by the range fields.
///
/// # Examples
/// ```
/// use clips_models::timecode::format_timecode;
/// assert_eq!(format_timecode(90.0), "1:30");
/// assert_eq!(format_timecode(5.4), "0:05");
/// ```
pub fn format_timecode(total_secs: f64) -> String {
    let total_secs = total_secs.max(0.0);
    let minutes = (total_secs / 60.0).floor() as u64;
    let seconds = (total_secs % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, seconds)
}
