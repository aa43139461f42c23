//! Lenient date handling for the string dates stored on records

use chrono::{DateTime, Datelike, NaiveDate};

/// Placeholder rendered when a date (or any optional value) is unavailable
pub const NOT_AVAILABLE: &str = "N/A";

const MONTH_NAMES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

/// Records carrying a date string
pub trait Dated {
    fn date_str(&self) -> &str;

    fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(self.date_str())
    }
}

impl Dated for String {
    fn date_str(&self) -> &str {
        self
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp. Anything else is `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Long Spanish date, e.g. "15 de enero de 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    )
}

/// Latest parseable date among `items`, formatted long; `N/A` when none parse
pub fn most_recent_date<'a, D, I>(items: I) -> String
where
    D: Dated + 'a,
    I: IntoIterator<Item = &'a D>,
{
    items
        .into_iter()
        .filter_map(|item| item.parsed_date())
        .max()
        .map(format_long_date)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2020-01-01"), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(parse_date("2024-03-05T10:00:00Z"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-02-30"), None);
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(format_long_date(date), "15 de enero de 2024");
    }

    #[test]
    fn test_most_recent_date() {
        let dates = vec![
            "2023-05-01".to_string(),
            "garbage".to_string(),
            "2024-02-10".to_string(),
            "2022-12-31".to_string(),
        ];
        assert_eq!(most_recent_date(&dates), "10 de febrero de 2024");
    }

    #[test]
    fn test_most_recent_date_empty() {
        let dates: Vec<String> = Vec::new();
        assert_eq!(most_recent_date(&dates), NOT_AVAILABLE);
        let unparseable = vec![String::new()];
        assert_eq!(most_recent_date(&unparseable), NOT_AVAILABLE);
    }
}
