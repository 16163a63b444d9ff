use time::{Date, Duration, OffsetDateTime, Weekday};
use time_tz::{ToTimezone, timezones};

/// Current instant in `tz`, or in the local offset when no zone is given.
///
/// Falls back to UTC when the local offset cannot be determined.
pub fn now(tz: Option<&str>) -> OffsetDateTime {
    let utc = OffsetDateTime::now_utc();

    if let Some(name) = tz {
        match timezones::get_by_name(name) {
            Some(tz) => return utc.to_timezone(tz),
            None => tracing::warn!(timezone = name, "unknown timezone, using local offset"),
        }
    }

    OffsetDateTime::now_local().unwrap_or_else(|err| {
        tracing::warn!(err = %err, "local offset unavailable, using UTC");
        utc
    })
}

/// Most recent `first_day` on or before the calendar date of `now`.
///
/// The result depends only on the date part of `now` in its own offset.
pub fn week_boundary(now: OffsetDateTime, first_day: Weekday) -> Date {
    let today = now.date();
    let days_back =
        (today.weekday().number_days_from_sunday() + 7 - first_day.number_days_from_sunday()) % 7;

    today - Duration::days(days_back as i64)
}
