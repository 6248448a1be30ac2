//! Human-entered date parsing and the timestamp formats handed to git.
//!
//! Recognized inputs: `today`, `yesterday`, `now`, `<N>d` (N whole days before the start of
//! today), `today HH:MM`, `yesterday HH:MM`, and otherwise RFC 3339, `YYYY-MM-DD` (UTC midnight)
//! or a local `YYYY-MM-DD HH:MM[:SS]`.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Error, Result};

/// An absolute point in time, expressed in the local timezone.
pub type Instant = DateTime<Local>;

/// Resolved `since`/`until` pair. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<Instant>,
    pub until: Option<Instant>,
}

pub fn parse_date(text: &str) -> Result<Instant> {
    parse_date_at(text, Local::now())
}

/// Same as [`parse_date`], relative to an explicit `now`.
pub fn parse_date_at(text: &str, now: Instant) -> Result<Instant> {
    let today = now.date_naive();

    match text {
        "today" => return local_time(today, 0, 0, text),
        "yesterday" => return local_time(days_before(today, 1, text)?, 0, 0, text),
        "now" => return Ok(now),
        _ => {}
    }

    if let Some(days) = text.strip_suffix('d').filter(|n| is_digits(n)) {
        let days = days.parse::<u64>().map_err(|_| invalid(text))?;
        return local_time(days_before(today, days, text)?, 0, 0, text);
    }

    if let Some(clock) = clock_after(text, "today") {
        let (hours, minutes) = parse_clock(clock, text)?;
        return local_time(today, hours, minutes, text);
    }

    if let Some(clock) = clock_after(text, "yesterday") {
        let (hours, minutes) = parse_clock(clock, text)?;
        return local_time(days_before(today, 1, text)?, hours, minutes, text);
    }

    parse_generic(text)
}

pub fn parse_date_range(since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
    parse_date_range_at(since, until, Local::now())
}

pub fn parse_date_range_at(
    since: Option<&str>,
    until: Option<&str>,
    now: Instant,
) -> Result<DateRange> {
    let range = DateRange {
        since: since.map(|s| parse_date_at(s, now)).transpose()?,
        until: until.map(|u| parse_date_at(u, now)).transpose()?,
    };

    if let (Some(since), Some(until)) = (range.since, range.until) {
        if since > until {
            return Err(Error::InvalidRange);
        }
    }

    Ok(range)
}

/// Timestamp for git's `--since`/`--until`: UTC with millisecond precision, e.g.
/// `2025-09-29T10:00:00.000Z`.
pub fn format_for_git<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn format_for_display<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.with_timezone(&Local).format("%m/%d/%Y %H:%M").to_string()
}

/// Start of the day `days` days ago.
pub fn default_since(days: u32) -> Result<Instant> {
    default_since_at(days, Local::now())
}

pub fn default_since_at(days: u32, now: Instant) -> Result<Instant> {
    parse_date_at(&format!("{days}d"), now)
}

pub fn start_of_today() -> Result<Instant> {
    start_of_day(Local::now())
}

pub fn end_of_today() -> Result<Instant> {
    end_of_day(Local::now())
}

/// Local midnight of the day containing `now`.
pub fn start_of_day(now: Instant) -> Result<Instant> {
    parse_date_at("today", now)
}

/// 23:59:59.999 local time on the day containing `now`.
pub fn end_of_day(now: Instant) -> Result<Instant> {
    now.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|naive| Local.from_local_datetime(&naive).latest())
        .ok_or_else(|| invalid("end of today"))
}

pub fn is_today<Tz: TimeZone>(instant: &DateTime<Tz>) -> bool {
    is_same_day(instant, Local::now())
}

pub fn is_same_day<Tz: TimeZone>(instant: &DateTime<Tz>, now: Instant) -> bool {
    instant.with_timezone(&Local).date_naive() == now.date_naive()
}

/// Offset of the local timezone, e.g. `UTC+09:00`.
pub fn timezone_name() -> String {
    format!("UTC{}", Local::now().format("%:z"))
}

fn parse_generic(text: &str) -> Result<Instant> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Local));
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| invalid(text))?;
        return Ok(Utc.from_utc_datetime(&midnight).with_timezone(&Local));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local.from_local_datetime(&naive).earliest().ok_or_else(|| invalid(text));
        }
    }

    Err(invalid(text))
}

/// `"today 09:30"` -> `Some("09:30")` for `word = "today"`. Requires at least one whitespace
/// character between the word and the clock.
fn clock_after<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    let clock = rest.trim_start();
    (clock.len() < rest.len()).then_some(clock)
}

fn parse_clock(clock: &str, text: &str) -> Result<(u32, u32)> {
    let (hours, minutes) = clock.split_once(':').ok_or_else(|| invalid(text))?;
    if !(1..=2).contains(&hours.len())
        || minutes.len() != 2
        || !is_digits(hours)
        || !is_digits(minutes)
    {
        return Err(invalid(text));
    }
    let hours = hours.parse().map_err(|_| invalid(text))?;
    let minutes = minutes.parse().map_err(|_| invalid(text))?;
    Ok((hours, minutes))
}

fn local_time(date: NaiveDate, hours: u32, minutes: u32, text: &str) -> Result<Instant> {
    date.and_hms_opt(hours, minutes, 0)
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .ok_or_else(|| invalid(text))
}

fn days_before(date: NaiveDate, days: u64, text: &str) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(days)).ok_or_else(|| invalid(text))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn invalid(text: &str) -> Error {
    Error::InvalidDateFormat(text.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn now() -> Instant {
        Local.with_ymd_and_hms(2025, 9, 30, 14, 30, 15).earliest().unwrap()
    }

    fn ymd_hm(instant: Instant) -> (i32, u32, u32, u32, u32) {
        (
            instant.year(),
            instant.month(),
            instant.day(),
            instant.hour(),
            instant.minute(),
        )
    }

    #[test]
    fn test_today_is_start_of_day() {
        let today = parse_date_at("today", now()).unwrap();
        assert_eq!(ymd_hm(today), (2025, 9, 30, 0, 0));
        assert_eq!(today.second(), 0);
    }

    #[test]
    fn test_yesterday_is_start_of_previous_day() {
        let yesterday = parse_date_at("yesterday", now()).unwrap();
        assert_eq!(ymd_hm(yesterday), (2025, 9, 29, 0, 0));
    }

    #[test]
    fn test_now_is_unchanged() {
        assert_eq!(parse_date_at("now", now()).unwrap(), now());
    }

    #[test]
    fn test_days_ago() {
        let week = parse_date_at("7d", now()).unwrap();
        assert_eq!(ymd_hm(week), (2025, 9, 23, 0, 0));

        let zero = parse_date_at("0d", now()).unwrap();
        assert_eq!(zero, parse_date_at("today", now()).unwrap());
    }

    #[test]
    fn test_clock_on_today_and_yesterday() {
        let today = parse_date_at("today 09:30", now()).unwrap();
        assert_eq!(ymd_hm(today), (2025, 9, 30, 9, 30));

        let yesterday = parse_date_at("yesterday  7:05", now()).unwrap();
        assert_eq!(ymd_hm(yesterday), (2025, 9, 29, 7, 5));
    }

    #[test]
    fn test_clock_out_of_range_is_rejected() {
        assert!(matches!(
            parse_date_at("today 25:00", now()),
            Err(Error::InvalidDateFormat(_))
        ));
        assert!(matches!(
            parse_date_at("today 9:5", now()),
            Err(Error::InvalidDateFormat(_))
        ));
        assert!(matches!(
            parse_date_at("today09:00", now()),
            Err(Error::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_generic_formats() {
        let rfc = parse_date_at("2025-09-29T10:00:00+00:00", now()).unwrap();
        assert_eq!(rfc, Utc.with_ymd_and_hms(2025, 9, 29, 10, 0, 0).unwrap());

        let date_only = parse_date_at("2025-09-29", now()).unwrap();
        assert_eq!(date_only, Utc.with_ymd_and_hms(2025, 9, 29, 0, 0, 0).unwrap());

        let local = parse_date_at("2025-09-29 08:15", now()).unwrap();
        assert_eq!(ymd_hm(local), (2025, 9, 29, 8, 15));
    }

    #[test]
    fn test_invalid_format() {
        match parse_date_at("last tuesday", now()) {
            Err(Error::InvalidDateFormat(input)) => assert_eq!(input, "last tuesday"),
            other => panic!("expected InvalidDateFormat, got {other:?}"),
        }
        assert!(parse_date_at("d", now()).is_err());
        assert!(parse_date_at("", now()).is_err());
    }

    #[test]
    fn test_range_spanning_a_week() {
        let range = parse_date_range_at(Some("7d"), Some("today"), now()).unwrap();
        let (since, until) = (range.since.unwrap(), range.until.unwrap());
        assert!(since <= until);
        assert_eq!((until.date_naive() - since.date_naive()).num_days(), 7);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!(matches!(
            parse_date_range_at(Some("today"), Some("7d"), now()),
            Err(Error::InvalidRange)
        ));
    }

    #[test]
    fn test_open_ended_range() {
        let range = parse_date_range_at(Some("yesterday"), None, now()).unwrap();
        assert!(range.since.is_some());
        assert!(range.until.is_none());

        assert_eq!(parse_date_range_at(None, None, now()).unwrap(), DateRange::default());
    }

    #[test]
    fn test_format_for_git() {
        let instant = Utc.with_ymd_and_hms(2025, 9, 29, 10, 0, 0).unwrap();
        assert_eq!(format_for_git(&instant), "2025-09-29T10:00:00.000Z");
    }

    #[test]
    fn test_format_for_git_parses_back() {
        let text = "2025-09-29T10:00:00.123Z";
        let instant = parse_date_at(text, now()).unwrap();
        assert_eq!(format_for_git(&instant), text);
    }

    #[test]
    fn test_default_since_is_start_of_day() {
        let since = default_since_at(3, now()).unwrap();
        assert_eq!(ymd_hm(since), (2025, 9, 27, 0, 0));
        assert_eq!(since.second(), 0);
    }

    #[test]
    fn test_day_bounds() {
        let start = start_of_day(now()).unwrap();
        let end = end_of_day(now()).unwrap();

        assert_eq!(ymd_hm(start), (2025, 9, 30, 0, 0));
        assert_eq!(ymd_hm(end), (2025, 9, 30, 23, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
        assert!(is_same_day(&start, now()));
        assert!(is_same_day(&end, now()));
        assert!(!is_same_day(&(start - chrono::Duration::seconds(1)), now()));
        assert!(!is_same_day(&(end + chrono::Duration::milliseconds(1)), now()));
    }
}
