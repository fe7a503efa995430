use chrono::Duration;

use super::serial::serial_to_duration;
use super::ValueConverter;
use crate::culture::Culture;
use crate::error::SheetBindError;
use crate::types::{CellValue, TypeKey};

const TICKS_PER_SECOND: i64 = 10_000_000;

/// Writes `chrono::Duration` fields as `[-][d.]hh:mm:ss[.fffffff]`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSpanConverter;

impl ValueConverter for TimeSpanConverter {
    fn write(&self, value: CellValue, declared: TypeKey, _: &Culture) -> anyhow::Result<CellValue> {
        if declared != TypeKey::of::<Duration>() {
            return Ok(value);
        }
        match value {
            CellValue::Duration(d) => Ok(CellValue::Text(format_timespan(&d))),
            other => Ok(other),
        }
    }

    fn read(&self, value: CellValue) -> anyhow::Result<CellValue> {
        let parsed = match &value {
            CellValue::Duration(d) => Some(*d),
            CellValue::Float(days) => serial_to_duration(*days),
            CellValue::Text(text) => parse_timespan(text),
            _ => None,
        };
        parsed.map(CellValue::Duration).ok_or_else(|| {
            SheetBindError::Conversion(format!("Cannot parse timespan from '{}'", value)).into()
        })
    }
}

/// Canonical text form: `14:00:00`, `1.02:03:04`, `-00:00:01.5000000`
pub fn format_timespan(d: &Duration) -> String {
    let negative = *d < Duration::zero();
    let abs = if negative { -*d } else { *d };

    let days = abs.num_days();
    let hours = abs.num_hours() % 24;
    let minutes = abs.num_minutes() % 60;
    let seconds = abs.num_seconds() % 60;
    let ticks = abs.subsec_nanos() as i64 / 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if ticks > 0 {
        out.push_str(&format!(".{:07}", ticks));
    }
    out
}

/// Parse `[-][d.]hh:mm[:ss[.fraction]]` or a whole number of days.
pub fn parse_timespan(text: &str) -> Option<Duration> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if body.is_empty() {
        return None;
    }

    let total = if body.contains(':') {
        parse_clock(body)?
    } else {
        Duration::try_days(body.parse::<i64>().ok()?)?
    };
    Some(if negative { -total } else { total })
}

fn parse_clock(body: &str) -> Option<Duration> {
    let mut parts = body.split(':');
    let first = parts.next()?;
    let (days, hours) = match first.split_once('.') {
        Some((d, h)) => (parse_digits(d)?, parse_digits(h)?),
        None => (0, parse_digits(first)?),
    };
    let minutes = parse_digits(parts.next()?)?;

    let (seconds, ticks) = match parts.next() {
        Some(sec) => match sec.split_once('.') {
            Some((s, frac)) => (parse_digits(s)?, parse_fraction(frac)?),
            None => (parse_digits(sec)?, 0),
        },
        None => (0, 0),
    };
    if parts.next().is_some() || hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    Duration::try_days(days)?
        .checked_add(&Duration::hours(hours))?
        .checked_add(&Duration::minutes(minutes))?
        .checked_add(&Duration::seconds(seconds))?
        .checked_add(&Duration::nanoseconds(ticks * 100))
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Fractional seconds, up to seven digits, as 100ns ticks
fn parse_fraction(frac: &str) -> Option<i64> {
    if frac.is_empty() || frac.len() > 7 {
        return None;
    }
    let value = parse_digits(frac)?;
    let scale = 10_i64.pow(7 - frac.len() as u32);
    let ticks = value * scale;
    (ticks < TICKS_PER_SECOND).then_some(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timespan() {
        assert_eq!(format_timespan(&Duration::hours(14)), "14:00:00");
        assert_eq!(format_timespan(&Duration::hours(8)), "08:00:00");
        assert_eq!(
            format_timespan(&(Duration::days(1) + Duration::hours(2) + Duration::seconds(4))),
            "1.02:00:04"
        );
        assert_eq!(format_timespan(&Duration::milliseconds(-1500)), "-00:00:01.5000000");
    }

    #[test]
    fn test_parse_timespan() {
        assert_eq!(parse_timespan("14:00:00"), Some(Duration::hours(14)));
        assert_eq!(parse_timespan("08:30"), Some(Duration::minutes(510)));
        assert_eq!(parse_timespan("3"), Some(Duration::days(3)));
        assert_eq!(
            parse_timespan("1.02:00:04"),
            Some(Duration::days(1) + Duration::hours(2) + Duration::seconds(4))
        );
        assert_eq!(parse_timespan("-00:00:01.5"), Some(Duration::milliseconds(-1500)));
    }

    #[test]
    fn test_parse_timespan_rejects_garbage() {
        assert_eq!(parse_timespan(""), None);
        assert_eq!(parse_timespan("25:00:00"), None);
        assert_eq!(parse_timespan("ab:cd"), None);
        assert_eq!(parse_timespan("1:2:3:4"), None);
    }

    #[test]
    fn test_parse_timespan_out_of_range() {
        assert_eq!(parse_timespan("999999999999999999"), None);
        assert_eq!(parse_timespan("999999999999999.01:00:00"), None);
        assert_eq!(parse_timespan("-999999999999999999"), None);
        assert!(TimeSpanConverter.read(CellValue::from("999999999999999999")).is_err());
    }

    #[test]
    fn test_converter_round_trip() {
        let d = Duration::hours(14) + Duration::milliseconds(250);
        let written = TimeSpanConverter
            .write(CellValue::Duration(d), TypeKey::of::<Duration>(), &Culture::invariant())
            .unwrap();
        assert_eq!(written, CellValue::from("14:00:00.2500000"));
        assert_eq!(TimeSpanConverter.read(written).unwrap(), CellValue::Duration(d));
    }

    #[test]
    fn test_read_failure_is_conversion_error() {
        let err = TimeSpanConverter.read(CellValue::from("soon")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetBindError>(),
            Some(SheetBindError::Conversion(_))
        ));
    }
}
