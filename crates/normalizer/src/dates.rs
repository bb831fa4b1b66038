use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Upper bound (exclusive) of spreadsheet serials: 9999-12-31 is serial 2958465.
const MAX_SERIAL: f64 = 2_958_466.0;

/// Two-digit years above this value land in the 1900s, the rest in the 2000s.
const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
const LONG_FORMATS: [&str; 4] = ["%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y"];

/// The shapes a date can arrive in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Text(&'a str),
    /// Days since 1899-12-30, the common spreadsheet epoch.
    Serial(f64),
}

/// Resolves any supported date shape to a calendar date.
pub fn parse_date(input: DateInput<'_>) -> Option<NaiveDate> {
    match input {
        DateInput::Date(date) => Some(date),
        DateInput::DateTime(datetime) => Some(datetime.date_naive()),
        DateInput::Text(text) => parse_date_text(text),
        DateInput::Serial(serial) => from_serial(serial),
    }
}

/// Resolves a JSON cell: numbers are serials, strings are parsed as text.
pub fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(number) => number.as_f64().and_then(from_serial),
        Value::String(text) => parse_date_text(text),
        _ => None,
    }
}

/// Converts a spreadsheet serial to a date. The fractional part (time of day) is dropped.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial <= 0.0 || serial >= MAX_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }
    if let Some(date) = parse_month_day_year(text) {
        return Some(date);
    }
    for format in LONG_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    if let Ok(serial) = text.parse::<f64>() {
        return from_serial(serial);
    }

    None
}

/// `MM/DD/YYYY`, also with `.` or `-` separators, 1-2 digit month/day and
/// 2-4 digit years. A trailing time component is ignored.
fn parse_month_day_year(text: &str) -> Option<NaiveDate> {
    let date_part = text.split_whitespace().next()?;
    let parts: Vec<&str> = date_part.split(['/', '.', '-']).collect();
    if parts.len() != 3 {
        return None;
    }

    let (month, day, year) = (parts[0], parts[1], parts[2]);
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(month) || !all_digits(day) || !all_digits(year) {
        return None;
    }
    if month.len() > 2 || day.len() > 2 || !(2..=4).contains(&year.len()) {
        return None;
    }

    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let year = if year < 100 {
        if year > TWO_DIGIT_YEAR_PIVOT {
            1900 + year
        } else {
            2000 + year
        }
    } else {
        year
    };

    NaiveDate::from_ymd_opt(year, month, day)
}
