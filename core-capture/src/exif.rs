//! Strict parser for EXIF `DateTimeOriginal` values.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

const EXIF_DATETIME_LEN: usize = 19;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExifDateError {
    #[error("expected 19 characters, found {0}")]
    InvalidLength(usize),

    #[error("unexpected character {found:?} at position {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("date or time out of range: {0}")]
    OutOfRange(String),
}

/// Parse `YYYY:MM:DD HH:MM:SS`.
///
/// Separators must sit at fixed positions, every other character must be an
/// ASCII digit, and the result must be a real calendar date and time. No
/// timezone is implied.
///
/// ```
/// use core_capture::exif::parse_exif_datetime;
///
/// let parsed = parse_exif_datetime("2024:02:29 23:59:01").unwrap();
/// assert_eq!(parsed.to_string(), "2024-02-29 23:59:01");
/// assert!(parse_exif_datetime("2024-02-29 23:59:01").is_err());
/// ```
pub fn parse_exif_datetime(value: &str) -> Result<NaiveDateTime, ExifDateError> {
    let bytes = value.as_bytes();
    if bytes.len() != EXIF_DATETIME_LEN {
        return Err(ExifDateError::InvalidLength(value.chars().count()));
    }

    for (position, &byte) in bytes.iter().enumerate() {
        let expected_ok = match position {
            4 | 7 | 13 | 16 => byte == b':',
            10 => byte == b' ',
            _ => byte.is_ascii_digit(),
        };
        if !expected_ok {
            return Err(ExifDateError::UnexpectedCharacter {
                position,
                found: value[position..].chars().next().unwrap_or('\u{FFFD}'),
            });
        }
    }

    // Every digit position was validated above.
    let number = |range: std::ops::Range<usize>| -> u32 {
        bytes[range]
            .iter()
            .fold(0, |acc, digit| acc * 10 + u32::from(digit - b'0'))
    };

    let year = number(0..4) as i32;
    let (month, day) = (number(5..7), number(8..10));
    let (hour, minute, second) = (number(11..13), number(14..16), number(17..19));

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| ExifDateError::OutOfRange(value.to_string()))
}
