use chrono::{DateTime, Utc};
use serenity::all::UserId;

/// Format a user mention
pub fn mention_user(user_id: UserId) -> String {
    format!("<@{}>", user_id)
}

/// Format a channel reference by name
pub fn channel_ref(name: &str) -> String {
    format!("#{}", name)
}

/// Format a number with commas
pub fn format_number(n: i64) -> String {
    let s = n.abs().to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if n < 0 {
        result.push('-');
    }

    result.chars().rev().collect()
}

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// `YYYY-MM-DD`
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mentions() {
        assert_eq!(mention_user(UserId::new(42)), "<@42>");
        assert_eq!(channel_ref("showcase"), "#showcase");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-45000), "-45,000");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long reason here", 9), "a long...");
        assert_eq!(truncate("ééééé", 4), "é...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();
        assert_eq!(format_date(ts), "2024-03-09");
    }
}
