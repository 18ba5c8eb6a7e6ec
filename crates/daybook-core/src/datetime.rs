use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

const TIMEZONE_ENV_VAR: &str = "DAYBOOK_TIMEZONE";
const DEFAULT_PROJECT_TIMEZONE: &str = "UTC";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static PROJECT_TZ: OnceLock<Tz> = OnceLock::new();

/// The timezone every "which calendar day is this instant" question is
/// answered in. Resolved once per process: explicit init (from config),
/// then the `DAYBOOK_TIMEZONE` env var, then the compiled default.
pub fn project_timezone() -> &'static Tz {
    PROJECT_TZ.get_or_init(resolve_project_timezone)
}

/// Installs the configured timezone before the first day-math call.
/// Later calls are ignored; the first resolution wins.
pub fn init_project_timezone(configured: Option<&str>) {
    let tz = configured
        .and_then(|raw| parse_timezone(raw, "config"))
        .unwrap_or_else(resolve_project_timezone);
    if PROJECT_TZ.set(tz).is_err() {
        tracing::debug!("project timezone already resolved; keeping it");
    }
}

fn resolve_project_timezone() -> Tz {
    if let Ok(raw) = std::env::var(TIMEZONE_ENV_VAR)
        && let Some(tz) = parse_timezone(&raw, TIMEZONE_ENV_VAR)
    {
        return tz;
    }

    parse_timezone(DEFAULT_PROJECT_TIMEZONE, "DEFAULT_PROJECT_TIMEZONE").unwrap_or_else(|| {
        tracing::error!("failed to parse fallback timezone; using UTC");
        chrono_tz::UTC
    })
}

fn parse_timezone(raw: &str, source: &str) -> Option<Tz> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        tracing::warn!(source, "timezone source was empty");
        return None;
    }

    match trimmed.parse::<Tz>() {
        Ok(tz) => {
            tracing::info!(source, timezone = %trimmed, "resolved project timezone");
            Some(tz)
        }
        Err(err) => {
            tracing::warn!(source, timezone = %trimmed, error = %err, "invalid timezone name");
            None
        }
    }
}

/// Calendar day of an instant in the project timezone.
#[must_use]
pub fn local_day(dt: DateTime<Utc>) -> NaiveDate {
    day_in(dt, project_timezone())
}

/// Calendar day of an instant in an explicit timezone.
#[must_use]
pub fn day_in(dt: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    dt.with_timezone(tz).date_naive()
}

/// Today in the project timezone.
#[must_use]
pub fn today() -> NaiveDate {
    local_day(Utc::now())
}

/// Noon of a calendar day in the project timezone, as a UTC instant.
/// Used to anchor fixtures to a displayed day.
#[must_use]
pub fn day_anchor(day: NaiveDate) -> DateTime<Utc> {
    let noon = day
        .and_hms_opt(12, 0, 0)
        .unwrap_or_else(|| day.and_time(chrono::NaiveTime::MIN));
    project_timezone()
        .from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&noon))
}

/// Number of days in a month, leap years included. `month0` is
/// zero-based, matching how the calendar cursor counts months.
#[must_use]
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let month = month0 + 1;
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Weekday index of day 1 of a month (0 = Sunday), which is also the
/// count of leading blank cells in a 7-column grid.
#[must_use]
pub fn first_weekday_offset(year: i32, month0: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

#[must_use]
pub fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES
        .get(month0 as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// "Today" for the window anchor, otherwise e.g. "August 7, 2026".
#[must_use]
pub fn format_day(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else {
        day.format("%B %-d, %Y").to_string()
    }
}

#[must_use]
pub fn weekday_name(day: NaiveDate) -> String {
    day.format("%A").to_string()
}

/// Compact date of an instant in the project timezone, e.g. "Aug 8, 2026".
#[must_use]
pub fn format_short_date(dt: DateTime<Utc>) -> String {
    dt.with_timezone(project_timezone())
        .format("%b %-d, %Y")
        .to_string()
}

/// Wall-clock time of an instant in the project timezone, e.g. "9:41 AM".
#[must_use]
pub fn format_clock(dt: DateTime<Utc>) -> String {
    dt.with_timezone(project_timezone())
        .format("%-I:%M %p")
        .to_string()
}
