//! School-year calendar computations.
//!
//! Pure functions, no I/O. The association's year runs Sept 1 to Aug 31 and
//! activities happen on Saturdays; the month view therefore only surfaces
//! Saturday slots. All civil-date arithmetic happens in one configured time
//! zone, passed in explicitly.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::attendance::{Attendance, AttendanceStatus};

/// Status of one calendar cell.
///
/// Saturdays carry the recorded status, or `none` when nothing was recorded;
/// every other weekday is `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Off,
    None,
    Present,
    Absent,
    Late,
    Excused,
}

impl From<AttendanceStatus> for SlotStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => SlotStatus::Present,
            AttendanceStatus::Absent => SlotStatus::Absent,
            AttendanceStatus::Late => SlotStatus::Late,
            AttendanceStatus::Excused => SlotStatus::Excused,
        }
    }
}

/// One day cell of the month grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DayCell {
    /// Day of month, 1-based.
    pub day: u32,
    pub is_saturday: bool,
    pub status: SlotStatus,
}

/// A rendered month of the attendance calendar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthView {
    /// Human label, e.g. "septembre 2025".
    pub label: String,
    /// Month key, e.g. "2025-09".
    pub month_key: String,
    /// Leading blanks before day 1 in a Monday-first grid (0-6).
    pub start_pad: u8,
    pub days: Vec<DayCell>,
    /// Previous month key, `None` before the school-year start.
    pub prev: Option<String>,
    /// Next month key, `None` past the school-year end.
    pub next: Option<String>,
}

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// School-year window for the year starting in September of `start_year`:
/// Sept 1 00:00:00 through Aug 31 23:59:59 of the next year, in `tz`.
pub fn school_year_range(start_year: i32, tz: Tz) -> (DateTime<Tz>, DateTime<Tz>) {
    let start = at_civil(
        tz,
        NaiveDate::from_ymd_opt(start_year, 9, 1).expect("Sept 1 exists"),
        NaiveTime::from_hms_opt(0, 0, 0).expect("midnight exists"),
    );
    let end = at_civil(
        tz,
        NaiveDate::from_ymd_opt(start_year + 1, 8, 31).expect("Aug 31 exists"),
        NaiveTime::from_hms_opt(23, 59, 59).expect("end of day exists"),
    );
    (start, end)
}

/// School-year window as plain dates (Sept 1 to Aug 31).
pub fn school_year_dates(start_year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(start_year, 9, 1).expect("Sept 1 exists"),
        NaiveDate::from_ymd_opt(start_year + 1, 8, 31).expect("Aug 31 exists"),
    )
}

/// The school year `today` belongs to: the current year from September on,
/// the previous year before.
pub fn default_school_start_year(today: NaiveDate) -> i32 {
    if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    }
}

/// First day of the month containing `day`, clamped into the school year.
pub fn clamp_month_into_year(day: NaiveDate, sy_start: NaiveDate, sy_end: NaiveDate) -> NaiveDate {
    let clamped = day.clamp(sy_start, sy_end);
    first_of_month(clamped)
}

/// Calendar bounds of the month containing `day` (first and last day).
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = first_of_month(day);
    let end = next_month(start) - Duration::days(1);
    (start, end)
}

/// Builds the month view for the month containing `month`.
///
/// Only Saturday cells surface a recorded status; a record on any other
/// weekday is a data anomaly and is ignored for display. `prev`/`next`
/// navigation keys are clamped to `None` outside `[sy_start, sy_end]`.
pub fn build_month_view(
    month: NaiveDate,
    records: &[Attendance],
    sy_start: NaiveDate,
    sy_end: NaiveDate,
) -> MonthView {
    let month_start = first_of_month(month);

    let by_date: HashMap<NaiveDate, AttendanceStatus> =
        records.iter().map(|a| (a.date, a.status)).collect();

    let days_in_month = (next_month(month_start) - month_start).num_days() as u32;
    let days = (1..=days_in_month)
        .map(|day| {
            let date = month_start
                .with_day(day)
                .expect("day within month length");
            let is_saturday = date.weekday() == chrono::Weekday::Sat;
            let status = if is_saturday {
                by_date
                    .get(&date)
                    .map(|s| SlotStatus::from(*s))
                    .unwrap_or(SlotStatus::None)
            } else {
                SlotStatus::Off
            };
            DayCell {
                day,
                is_saturday,
                status,
            }
        })
        .collect();

    // Monday-first header: Monday pads 0, Sunday pads 6.
    let start_pad = month_start.weekday().num_days_from_monday() as u8;

    let prev_start = previous_month(month_start);
    let next_start = next_month(month_start);
    let prev = (prev_start >= first_of_month(sy_start)).then(|| month_key(prev_start));
    let next = (next_start <= first_of_month(sy_end)).then(|| month_key(next_start));

    MonthView {
        label: month_label(month_start),
        month_key: month_key(month_start),
        start_pad,
        days,
        prev,
        next,
    }
}

/// "YYYY-MM" key for the month containing `date`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parses a "YYYY-MM" key into the first day of that month.
pub fn parse_month_key(key: &str) -> Option<NaiveDate> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// French "month year" label, e.g. "septembre 2025".
fn month_label(month_start: NaiveDate) -> String {
    format!(
        "{} {}",
        FRENCH_MONTHS[month_start.month0() as usize],
        month_start.year()
    )
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

fn next_month(month_start: NaiveDate) -> NaiveDate {
    let (year, month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month exists")
}

fn previous_month(month_start: NaiveDate) -> NaiveDate {
    let (year, month) = if month_start.month() == 1 {
        (month_start.year() - 1, 12)
    } else {
        (month_start.year(), month_start.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month exists")
}

/// Resolves a civil wall-clock time in `tz`, shifting forward through
/// spring-forward gaps and taking the earlier instant when ambiguous.
fn at_civil(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(date.and_time(time) + Duration::hours(1)))
            .earliest()
            .expect("civil time resolvable after gap shift"),
    }
}
