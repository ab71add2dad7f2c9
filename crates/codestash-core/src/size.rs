//! Human-readable size parsing and formatting

use crate::error::{Error, Result};

const UNITS: &[(&str, u64)] = &[
    ("TB", 1024 * 1024 * 1024 * 1024),
    ("GB", 1024 * 1024 * 1024),
    ("MB", 1024 * 1024),
    ("KB", 1024),
    ("B", 1),
];

/// Parse a human-readable size string such as "20MB" or "1.5GB" into bytes.
///
/// A bare number is taken as bytes. Unit suffixes are case-insensitive and
/// may carry a fractional value.
pub fn parse_size(input: &str) -> Result<u64> {
    let normalized = input.trim().to_uppercase();

    if normalized.is_empty() {
        return Err(Error::invalid_size(input));
    }

    if normalized.chars().all(|c| c.is_ascii_digit()) {
        return normalized
            .parse::<u64>()
            .map_err(|_| Error::invalid_size(input));
    }

    // Longest suffix first so "20MB" is not consumed by the bare "B" unit
    for (unit, multiplier) in UNITS {
        if let Some(value) = normalized.strip_suffix(unit) {
            let value = value.trim();
            if value.is_empty() {
                return Err(Error::invalid_size(input));
            }
            let parsed: f64 = value.parse().map_err(|_| Error::invalid_size(input))?;
            if parsed < 0.0 || !parsed.is_finite() {
                return Err(Error::invalid_size(input));
            }
            return Ok((parsed * *multiplier as f64) as u64);
        }
    }

    Err(Error::invalid_size(input))
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const NAMES: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < NAMES.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, NAMES[0])
    } else {
        format!("{:.2} {}", size, NAMES[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_bytes() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_size("1B").unwrap(), 1);
        assert_eq!(parse_size("2KB").unwrap(), 2048);
        assert_eq!(parse_size("20MB").unwrap(), 20 * 1024 * 1024);
        assert_eq!(parse_size("1GB").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("1TB").unwrap(), 1024u64.pow(4));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_size("20mb").unwrap(), 20 * 1024 * 1024);
        assert_eq!(parse_size(" 5kb ").unwrap(), 5 * 1024);
    }

    #[test]
    fn test_parse_fractional_values() {
        assert_eq!(parse_size("1.5KB").unwrap(), 1536);
        assert_eq!(parse_size("0.5MB").unwrap(), 512 * 1024);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("MB").is_err());
        assert!(parse_size("20XB").is_err());
        assert!(parse_size("twenty MB").is_err());
        assert!(parse_size("-5MB").is_err());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(5_242_880), "5.00 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
    }
}
