use anyhow::{Result, anyhow, bail};
use time::{Date, OffsetDateTime};

pub const SECONDS_PER_DAY: i64 = 86_400;
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Converts a UTC calendar-day number (whole days since 1970-01-01) back
/// into a date. Pre-epoch days are rejected, matching the non-negative
/// timestamp constraint of the log store.
pub fn date_from_unix_day(unix_day: i64) -> Result<Date> {
    if unix_day < 0 {
        bail!("days before 1970-01-01 are not supported");
    }

    let unix_seconds = unix_day
        .checked_mul(SECONDS_PER_DAY)
        .ok_or_else(|| anyhow!("unix day exceeds supported range"))?;
    let midnight = OffsetDateTime::from_unix_timestamp(unix_seconds)
        .map_err(|_| anyhow!("unix day exceeds supported range"))?;
    Ok(midnight.date())
}

/// `Month DD, YYYY` with the English month name and a zero-padded day.
#[must_use]
pub fn format_long_date(date: Date) -> String {
    format!("{} {:02}, {}", date.month(), date.day(), date.year())
}
