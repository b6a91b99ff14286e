//! Conversions between the stored and displayed date shapes.
//!
//! Leads carry their last contact date in the `MM/DD/YY` display form, while
//! date pickers and exports use `YYYY-MM-DD`. Two digit years are always read
//! as `20YY`.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Date and time parts of a note stamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// `MM/DD/YY`.
    pub date: String,
    /// `h:mm AM/PM`.
    pub time: String,
    /// `"<date> <time>"`.
    pub formatted: String,
}

/// Formats the given moment as `MM/DD/YY`.
pub fn display_date_of(moment: &NaiveDateTime) -> String {
    moment.format("%m/%d/%y").to_string()
}

/// Builds a note stamp for the given moment.
pub fn timestamp_of(moment: &NaiveDateTime) -> Timestamp {
    let date = display_date_of(moment);
    let (is_pm, hour) = moment.hour12();
    let time = format!(
        "{hour}:{:02} {}",
        moment.minute(),
        if is_pm { "PM" } else { "AM" }
    );
    let formatted = format!("{date} {time}");
    Timestamp {
        date,
        time,
        formatted,
    }
}

/// Today's local date as `MM/DD/YY`.
pub fn today_display() -> String {
    display_date_of(&Local::now().naive_local())
}

/// Local "now" as a note stamp.
pub fn now_timestamp() -> Timestamp {
    timestamp_of(&Local::now().naive_local())
}

/// Converts `MM/DD/YY` into `YYYY-MM-DD`.
///
/// Input that does not split into three `/` separated parts is returned as is.
pub fn to_storage_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let parts: Vec<&str> = value.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return value.to_string();
    };
    format!("{}-{month:0>2}-{day:0>2}", expand_year(year))
}

/// Converts `YYYY-MM-DD` into `MM/DD/YY`.
///
/// Input that does not split into three `-` separated parts is returned as is.
pub fn to_display_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return value.to_string();
    };
    let short_year = year.get(2..).unwrap_or_default();
    format!("{month}/{day}/{short_year}")
}

/// Parses a `MM/DD/YY` value into a calendar date.
///
/// Returns `None` when the value does not have exactly three segments or the
/// segments do not form a valid date.
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };
    let year: i32 = expand_year(year).parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

static DISPLAY_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12][0-9]|3[01])/\d{2}$")
        .expect("date pattern compiles")
});

/// Checks the strict `MM/DD/YY` input pattern used by date fields.
pub fn is_display_date(value: &str) -> bool {
    DISPLAY_DATE_RE.is_match(value)
}

fn expand_year(year: &str) -> String {
    if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid moment")
    }

    #[test]
    fn display_date_is_zero_padded() {
        assert_eq!(display_date_of(&at(2025, 4, 5, 9, 0)), "04/05/25");
    }

    #[test]
    fn timestamp_uses_twelve_hour_clock() {
        let midnight = timestamp_of(&at(2025, 4, 15, 0, 7));
        assert_eq!(midnight.time, "12:07 AM");

        let afternoon = timestamp_of(&at(2025, 4, 15, 14, 30));
        assert_eq!(afternoon.date, "04/15/25");
        assert_eq!(afternoon.time, "2:30 PM");
        assert_eq!(afternoon.formatted, "04/15/25 2:30 PM");

        let noon = timestamp_of(&at(2025, 4, 15, 12, 0));
        assert_eq!(noon.time, "12:00 PM");
    }

    #[test]
    fn storage_and_display_round_trip() {
        for date in ["04/15/25", "12/31/24", "01/02/99"] {
            assert_eq!(to_display_date(&to_storage_date(date)), date);
        }
        assert_eq!(to_storage_date("4/5/25"), "2025-04-05");
        assert_eq!(to_display_date("2025-04-05"), "04/05/25");
    }

    #[test]
    fn malformed_input_is_returned_unchanged() {
        assert_eq!(to_storage_date("yesterday"), "yesterday");
        assert_eq!(to_storage_date("04/15"), "04/15");
        assert_eq!(to_display_date("2025/04/15"), "2025/04/15");
        assert_eq!(to_display_date(""), "");
    }

    #[test]
    fn parses_display_dates() {
        assert_eq!(
            parse_display_date("12/31/24"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(parse_display_date("13/01/24"), None);
        assert_eq!(parse_display_date("n/a"), None);
    }

    #[test]
    fn strict_pattern_check() {
        assert!(is_display_date("04/15/25"));
        assert!(!is_display_date("4/15/25"));
        assert!(!is_display_date("13/15/25"));
        assert!(!is_display_date("04/32/25"));
        assert!(!is_display_date("00/10/25"));
        assert!(!is_display_date("04-15-25"));
    }
}
