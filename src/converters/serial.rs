//! Excel serial date numbers (days since 1899-12-30)

use chrono::{Duration, NaiveDate, NaiveDateTime};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

pub(crate) fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    (*dt - epoch()).num_milliseconds() as f64 / MILLIS_PER_DAY
}

pub(crate) fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    epoch().checked_add_signed(serial_millis(serial)?)
}

pub(crate) fn duration_to_serial(d: &Duration) -> f64 {
    d.num_milliseconds() as f64 / MILLIS_PER_DAY
}

pub(crate) fn serial_to_duration(serial: f64) -> Option<Duration> {
    serial_millis(serial)
}

/// `None` when the serial falls outside the `i64` millisecond range
fn serial_millis(serial: f64) -> Option<Duration> {
    let millis = (serial * MILLIS_PER_DAY).round();
    if !millis.is_finite() || millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}
