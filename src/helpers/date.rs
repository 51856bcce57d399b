//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD/MM/YYYY") // -> "15/01/2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date in ISO 8601, as used by `<time datetime>`
pub fn date_iso<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Moment.js tokens and their chrono specifiers, longest first within each unit
const MOMENT_TOKENS: [(&str, &str); 15] = [
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("DDDD", "%j"),
    ("DD", "%d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("SSS", "%3f"),
    ("ZZ", "%z"),
];

/// Convert Moment.js format to chrono format
///
/// Tokens are matched in one left-to-right pass, so a specifier produced for
/// one token is never read again. Everything else is literal: `%` is escaped
/// and `[...]` is copied without its brackets.
fn moment_to_chrono_format(format: &str) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'scan: while !rest.is_empty() {
        if let Some(bracketed) = rest.strip_prefix('[') {
            if let Some(end) = bracketed.find(']') {
                push_literal(&mut result, &bracketed[..end]);
                rest = &bracketed[end + 1..];
                continue;
            }
        }

        for (token, specifier) in MOMENT_TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                result.push_str(specifier);
                rest = after;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            push_literal(&mut result, c.encode_utf8(&mut [0; 4]));
        }
        rest = chars.as_str();
    }

    result
}

fn push_literal(out: &mut String, text: &str) {
    out.push_str(&text.replace('%', "%%"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "DD/MM/YYYY"), "15/01/2024");
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "MMMM DD, YYYY"), "January 15, 2024");
    }

    #[test]
    fn test_format_date_in_zone() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 1, 0, 0).unwrap();
        let local = date.with_timezone(&chrono_tz::America::Sao_Paulo);
        assert_eq!(format_date(&local, "DD/MM/YYYY"), "14/01/2024");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("DD/MM/YYYY"), "%d/%m/%Y");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("MMmm"), "%m%M");
        assert_eq!(moment_to_chrono_format("dddd, MMMM DD"), "%A, %B %d");
        assert_eq!(moment_to_chrono_format("100%"), "100%%");
        assert_eq!(moment_to_chrono_format("[Day] DD"), "Day %d");
    }

    #[test]
    fn test_percent_and_literals_in_format() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "DD/MM/YYYY 100%"), "15/01/2024 100%");
        assert_eq!(format_date(&date, "%Y"), "%Y");
        assert_eq!(format_date(&date, "MMmm"), "0130");
        assert_eq!(format_date(&date, "[Posted] DD.MM"), "Posted 15.01");
        assert_eq!(format_date(&date, "[unclosed DD"), "[unclosed 15");
    }

    #[test]
    fn test_date_iso() {
        let date = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(date_iso(&date), "2020-03-01T00:00:00+00:00");
    }
}
