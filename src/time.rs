use chrono::{DateTime, Datelike, Timelike, Utc};

const DAYS_PER_YEAR: i64 = 365;

// Number of days in 4 years
const DAYS_PER_4_YEARS: i64 = DAYS_PER_YEAR * 4 + 1; // 1461

// Number of days in 100 years
const DAYS_PER_100_YEARS: i64 = DAYS_PER_4_YEARS * 25 - 1; // 36524

// Number of days in 400 years
const DAYS_PER_400_YEARS: i64 = DAYS_PER_100_YEARS * 4 + 1; // 146097

// Number of days from 0001-01-01 to 1969-12-31
const DAYS_TO_1970: i64 =
    DAYS_PER_400_YEARS * 4 + DAYS_PER_100_YEARS * 3 + DAYS_PER_4_YEARS * 17 + DAYS_PER_YEAR; // 719,162

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

pub(crate) const UNIX_EPOCH_MICROS: i64 = DAYS_TO_1970 * MICROS_PER_DAY; // 62,135,596,800,000,000

/// Converts a UTC instant to whole microseconds since the Unix epoch.
///
/// Sub-microsecond precision is truncated on the calendar-relative count,
/// before offsetting by the epoch, so the last digit is not off by one for
/// instants that map to negative Unix times.
pub fn to_epoch_micros(utc: DateTime<Utc>) -> i64 {
    let days = i64::from(utc.num_days_from_ce()) - 1;
    let second_of_day = i64::from(utc.num_seconds_from_midnight());
    let micros_into_second = i64::from(utc.nanosecond()) / 1_000;

    let micros = days * MICROS_PER_DAY + second_of_day * MICROS_PER_SECOND + micros_into_second;
    micros - UNIX_EPOCH_MICROS
}
