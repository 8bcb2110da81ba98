use core::fmt::{self, Write};
use std::borrow::Cow;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use fl_reflect::{BoxError, Loggable};
use serde_json::Value;

use super::to_json;
use crate::registry::Registry;

/// How a date-time is written.
#[derive(Debug, Clone)]
pub(crate) enum TimeLayout {
    /// RFC 3339 with whole seconds, `Z` for UTC.
    Rfc3339,
    /// A `chrono` strftime layout.
    Strftime(Cow<'static, str>),
    Unix,
    UnixMillis,
    UnixNanos,
}

const fn strftime(layout: &'static str) -> TimeLayout {
    TimeLayout::Strftime(Cow::Borrowed(layout))
}

const LAYOUTS: &[(&str, TimeLayout)] = &[
    ("time_rfc3339", TimeLayout::Rfc3339),
    ("time_iso8601", TimeLayout::Rfc3339),
    ("time_date", strftime("%Y-%m-%d")),
    ("time_datetime", strftime("%Y-%m-%d %H:%M:%S")),
    ("time_rfc822", strftime("%d %b %y %H:%M %Z")),
    ("time_rfc1123", strftime("%a, %d %b %Y %H:%M:%S %Z")),
    ("time_ansic", strftime("%a %b %e %H:%M:%S %Y")),
    ("time_kitchen", strftime("%-I:%M%p")),
    ("time_unix", TimeLayout::Unix),
    ("time_unix_ms", TimeLayout::UnixMillis),
    ("time_unix_ns", TimeLayout::UnixNanos),
    ("time_short_date", strftime("%Y-%m-%d")),
    ("time_long_date", strftime("%Y年%m月%d日")),
    ("time_filename", strftime("%Y%m%d_%H%M%S")),
    ("time_log", strftime("%Y/%m/%d %H:%M:%S%.3f")),
];

pub(super) fn install(registry: &Registry) {
    for (name, layout) in LAYOUTS {
        let name = *name;
        let layout = layout.clone();
        registry.register_lazy_serializer(name, move || serializer(name, layout.clone()));
    }
}

pub(crate) fn serializer(
    name: impl Into<String>,
    layout: TimeLayout,
) -> impl Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static {
    let name = name.into();
    move |value: &dyn Loggable| {
        let rendered = match stamp(value) {
            Some(Stamp::Utc(t)) => render(&t, &layout)?,
            Some(Stamp::Fixed(t)) => render(&t, &layout)?,
            Some(Stamp::Local(t)) => render(&t, &layout)?,
            None => {
                return Err(format!(
                    "{name} serializer expects a date-time, got {}",
                    value.short_type_name()
                )
                .into());
            }
        };
        to_json(&rendered)
    }
}

enum Stamp {
    Utc(DateTime<Utc>),
    Fixed(DateTime<FixedOffset>),
    Local(DateTime<Local>),
}

/// Naive date-times are read as UTC.
fn stamp(value: &dyn Loggable) -> Option<Stamp> {
    if let Some(t) = value.downcast_ref::<DateTime<Utc>>() {
        Some(Stamp::Utc(*t))
    } else if let Some(t) = value.downcast_ref::<DateTime<FixedOffset>>() {
        Some(Stamp::Fixed(*t))
    } else if let Some(t) = value.downcast_ref::<DateTime<Local>>() {
        Some(Stamp::Local(*t))
    } else if let Some(t) = value.downcast_ref::<NaiveDateTime>() {
        Some(Stamp::Utc(t.and_utc()))
    } else {
        value
            .downcast_ref::<SystemTime>()
            .map(|t| Stamp::Utc(DateTime::<Utc>::from(*t)))
    }
}

fn render<Tz>(t: &DateTime<Tz>, layout: &TimeLayout) -> Result<Value, BoxError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match layout {
        TimeLayout::Rfc3339 => Ok(t.to_rfc3339_opts(SecondsFormat::Secs, true).into()),
        TimeLayout::Unix => Ok(t.timestamp().into()),
        TimeLayout::UnixMillis => Ok(t.timestamp_millis().into()),
        TimeLayout::UnixNanos => t
            .timestamp_nanos_opt()
            .map(Value::from)
            .ok_or_else(|| "date-time out of range for nanoseconds".into()),
        TimeLayout::Strftime(layout) => {
            let mut out = String::new();
            write!(out, "{}", t.format(layout))
                .map_err(|_| format!("invalid time layout {layout:?}"))?;
            Ok(out.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
    use fl_reflect::Loggable;

    use super::{LAYOUTS, TimeLayout, serializer};

    fn sample() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 6, 789)
            .unwrap()
            .and_utc()
    }

    fn run(name: &str, value: &dyn Loggable) -> String {
        let layout = LAYOUTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, layout)| layout.clone())
            .unwrap();
        String::from_utf8(serializer(name, layout)(value).unwrap()).unwrap()
    }

    #[test]
    fn named_layouts() {
        let t = sample();
        assert_eq!(run("time_rfc3339", &t), r#""2024-03-09T14:05:06Z""#);
        assert_eq!(run("time_datetime", &t), r#""2024-03-09 14:05:06""#);
        assert_eq!(run("time_rfc1123", &t), r#""Sat, 09 Mar 2024 14:05:06 UTC""#);
        assert_eq!(run("time_kitchen", &t), r#""2:05PM""#);
        assert_eq!(run("time_long_date", &t), r#""2024年03月09日""#);
        assert_eq!(run("time_log", &t), r#""2024/03/09 14:05:06.789""#);
        assert_eq!(run("time_unix_ms", &t), "1709993106789");
    }

    #[test]
    fn offsets_and_naive() {
        let east = FixedOffset::east_opt(8 * 3600).unwrap();
        let t = sample().with_timezone(&east);
        assert_eq!(run("time_iso8601", &t), r#""2024-03-09T22:05:06+08:00""#);
        assert_eq!(run("time_unix", &sample().naive_utc()), "1709993106");
        let st = SystemTime::UNIX_EPOCH + Duration::from_secs(1);
        assert_eq!(run("time_unix", &st), "1");
    }

    #[test]
    fn wrong_type() {
        let err = serializer("time_date", TimeLayout::Rfc3339)(&"2024").unwrap_err();
        assert_eq!(err.to_string(), "time_date serializer expects a date-time, got &str");
    }
}
