use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid duration format. Use: 10s, 10m, 1h, or 1d")]
    InvalidFormat,

    #[error("Duration too long. The maximum is {}", format_max(.max))]
    TooLong { max: u64 },
}

fn format_max(max: &u64) -> String {
    format_duration(Duration::from_secs(*max))
}

/// Seconds per unit character
fn unit_multiplier(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3600),
        'd' => Some(86400),
        _ => None,
    }
}

/// Parses `"<digits><unit>"` strings such as `10m` or `1h`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationParser {
    /// Optional upper bound in seconds
    pub max_seconds: Option<u64>,
}

impl DurationParser {
    pub fn new(max_seconds: Option<u64>) -> Self {
        Self { max_seconds }
    }

    pub fn parse(&self, input: &str) -> Result<u64, DurationError> {
        let seconds = parse_seconds(input)?;

        match self.max_seconds {
            Some(max) if seconds > max => Err(DurationError::TooLong { max }),
            _ => Ok(seconds),
        }
    }

    pub fn parse_duration(&self, input: &str) -> Result<Duration, DurationError> {
        self.parse(input).map(Duration::from_secs)
    }
}

/// Unbounded parse of a duration string into seconds
pub fn parse_seconds(input: &str) -> Result<u64, DurationError> {
    let mut chars = input.chars();
    let unit = chars.next_back().ok_or(DurationError::InvalidFormat)?;
    let multiplier = unit_multiplier(unit).ok_or(DurationError::InvalidFormat)?;

    let magnitude = chars.as_str();
    if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationError::InvalidFormat);
    }

    magnitude
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or(DurationError::InvalidFormat)
}

/// Format duration for display
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    let (value, unit) = if total_secs < 60 {
        (total_secs, "second")
    } else if total_secs < 3600 {
        (total_secs / 60, "minute")
    } else if total_secs < 86400 {
        (total_secs / 3600, "hour")
    } else {
        (total_secs / 86400, "day")
    };

    format!("{} {}{}", value, unit, if value == 1 { "" } else { "s" })
}
