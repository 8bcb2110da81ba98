use core::fmt::Write;
use std::time::Duration;

use fl_reflect::{BoxError, Loggable};
use serde_json::Value;

use super::to_json;
use crate::registry::Registry;

const SECOND: u128 = 1_000_000_000;

type Format = fn(Duration) -> Value;

const FORMATS: &[(&str, Format)] = &[
    ("duration", |d| saturate(d.as_millis()).into()),
    ("duration_ns", |d| saturate(d.as_nanos()).into()),
    ("duration_us", |d| saturate(d.as_micros()).into()),
    ("duration_ms", |d| saturate(d.as_millis()).into()),
    ("duration_sec", |d| d.as_secs_f64().into()),
    ("duration_sec_int", |d| d.as_secs().into()),
    ("duration_min", |d| (d.as_secs_f64() / 60.0).into()),
    ("duration_hr", |d| (d.as_secs_f64() / 3600.0).into()),
    ("duration_string", |d| clock_string(d).into()),
    ("duration_short", |d| short_string(d).into()),
    ("duration_human", |d| human_string(d).into()),
];

const PRECISION: &[(&str, Duration, u32)] = &[
    ("duration_sec_2", Duration::from_secs(1), 2),
    ("duration_sec_3", Duration::from_secs(1), 3),
    ("duration_ms_1", Duration::from_millis(1), 1),
    ("duration_min_2", Duration::from_secs(60), 2),
];

pub(super) fn install(registry: &Registry) {
    for &(name, format) in FORMATS {
        registry.register_lazy_serializer(name, move || {
            move |value: &dyn Loggable| to_json(&format(expect_duration(name, value)?))
        });
    }
    for &(name, unit, precision) in PRECISION {
        registry.register_lazy_serializer(name, move || with_precision(name, unit, precision));
    }
}

/// A `Duration` as a float count of `unit`, rounded half away from zero.
pub(crate) fn with_precision(
    name: impl Into<String>,
    unit: Duration,
    precision: u32,
) -> impl Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static {
    let name = name.into();
    let scale = 10_f64.powi(precision as i32);
    move |value: &dyn Loggable| {
        let duration = expect_duration(&name, value)?;
        let count = duration.as_nanos() as f64 / unit.as_nanos() as f64;
        to_json(&((count * scale).round() / scale))
    }
}

fn expect_duration(name: &str, value: &dyn Loggable) -> Result<Duration, BoxError> {
    value.downcast_ref::<Duration>().copied().ok_or_else(|| {
        format!(
            "{name} serializer expects Duration, got {}",
            value.short_type_name()
        )
        .into()
    })
}

#[inline]
fn saturate(v: u128) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

/// `value / scale` with the fraction's trailing zeros dropped.
fn trimmed_fraction(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let rem = value % scale;
    if rem == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{rem:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// `72h3m0.5s`, `1.5ms`, `0s`.
fn clock_string(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }
    if nanos < SECOND {
        let (scale, unit) = match nanos {
            0..1_000 => (1, "ns"),
            1_000..1_000_000 => (1_000, "µs"),
            _ => (1_000_000, "ms"),
        };
        return format!("{}{unit}", trimmed_fraction(nanos, scale));
    }

    let secs = nanos / SECOND;
    let (hours, minutes) = (secs / 3600, secs / 60 % 60);
    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    out.push_str(&trimmed_fraction(nanos % (60 * SECOND), SECOND));
    out.push('s');
    out
}

/// Two decimals in the largest unit below the value.
fn short_string(d: Duration) -> String {
    let secs = d.as_secs_f64();
    match d.as_nanos() {
        n if n < 1_000 => format!("{n}ns"),
        n if n < 1_000_000 => format!("{:.2}µs", secs * 1e6),
        n if n < SECOND => format!("{:.2}ms", secs * 1e3),
        n if n < 60 * SECOND => format!("{secs:.2}s"),
        n if n < 3600 * SECOND => format!("{:.2}m", secs / 60.0),
        _ => format!("{:.2}h", secs / 3600.0),
    }
}

/// `1d 2h 3m 4s`; `N ms` below one second.
fn human_string(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        return format!("{} ms", d.as_millis());
    }
    let secs = d.as_secs();
    let units = [
        (secs / 86_400, "d"),
        (secs / 3600 % 24, "h"),
        (secs / 60 % 60, "m"),
    ];
    let mut parts: Vec<String> = units
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, unit)| format!("{count}{unit}"))
        .collect();
    let seconds = secs % 60;
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{clock_string, human_string, short_string, with_precision};

    #[test]
    fn clock_form() {
        let d = Duration::from_millis(3 * 3_600_000 + 30 * 60_000 + 45_123);
        assert_eq!(clock_string(d), "3h30m45.123s");
        assert_eq!(clock_string(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(clock_string(Duration::from_secs(90)), "1m30s");
        assert_eq!(clock_string(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(clock_string(Duration::from_nanos(10)), "10ns");
        assert_eq!(clock_string(Duration::ZERO), "0s");
    }

    #[test]
    fn short_form() {
        assert_eq!(short_string(Duration::from_nanos(999)), "999ns");
        assert_eq!(short_string(Duration::from_micros(1500)), "1.50ms");
        assert_eq!(short_string(Duration::from_secs(2)), "2.00s");
        assert_eq!(short_string(Duration::from_secs(90)), "1.50m");
        assert_eq!(short_string(Duration::from_secs(5400)), "1.50h");
    }

    #[test]
    fn human_form() {
        let d = Duration::from_secs(86_400 + 2 * 3600 + 3 * 60 + 4);
        assert_eq!(human_string(d), "1d 2h 3m 4s");
        assert_eq!(human_string(Duration::from_secs(7200)), "2h");
        assert_eq!(human_string(Duration::from_millis(250)), "250 ms");
    }

    #[test]
    fn precision_and_type_check() {
        let ser = with_precision("duration_sec_2", Duration::from_secs(1), 2);
        assert_eq!(ser(&Duration::from_millis(1_234)).unwrap(), b"1.23");
        let err = ser(&5_i32).unwrap_err();
        assert_eq!(err.to_string(), "duration_sec_2 serializer expects Duration, got i32");
    }
}
