//! Calendar-day keys in the planner's fixed timezone.
//!
//! Every date the planner stores or compares (due dates, generation dates,
//! weakness windows, reminder history) is a `YYYY-MM-DD` day in UTC+08:00.
//! Keys are held as `NaiveDate`, which serializes to exactly that shape, so
//! lexical and chronological order agree.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};

use crate::config::CALENDAR_OFFSET_SECONDS;

fn shift(at: DateTime<Utc>) -> chrono::NaiveDateTime {
  at.naive_utc() + Duration::seconds(CALENDAR_OFFSET_SECONDS as i64)
}

/// Calendar day of an instant in the planner's timezone
pub fn to_date_key(at: DateTime<Utc>) -> NaiveDate {
  shift(at).date()
}

/// Today's calendar day
pub fn today() -> NaiveDate {
  to_date_key(Utc::now())
}

/// Local wall-clock time of an instant as `HH:MM`
pub fn local_hhmm(at: DateTime<Utc>) -> String {
  shift(at).format("%H:%M").to_string()
}

/// Calendar-day arithmetic; saturates at the representable range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
  let offset = Days::new(days.unsigned_abs());
  if days >= 0 {
    date.checked_add_days(offset).unwrap_or(NaiveDate::MAX)
  } else {
    date.checked_sub_days(offset).unwrap_or(NaiveDate::MIN)
  }
}

/// Strict `YYYY-MM-DD` check
pub fn is_date_key(value: &str) -> bool {
  parse_date_key(value).is_some()
}

/// Parse a strict `YYYY-MM-DD` key into a valid calendar day
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
  let bytes = value.as_bytes();
  if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
    return None;
  }
  let digits_ok = bytes
    .iter()
    .enumerate()
    .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
  if !digits_ok {
    return None;
  }
  NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
