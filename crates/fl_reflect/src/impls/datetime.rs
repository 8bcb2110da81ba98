use alloc::vec::Vec;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::loggable::BoxError;
use crate::{LogKind, LogRef, Loggable, Typed};

fn quoted(text: &str) -> Result<Vec<u8>, BoxError> {
    serde_json::to_vec(text).map_err(Into::into)
}

/// Date and time values are opaque and encode as RFC 3339 strings when
/// they reach the generic JSON path.
macro_rules! impl_time {
    ($($ty:ty => |$v:ident| $text:expr),* $(,)?) => {$(
        impl Loggable for $ty {
            #[inline]
            fn as_loggable(&self) -> &dyn Loggable {
                self
            }

            #[inline]
            fn log_ref(&self) -> LogRef<'_> {
                LogRef::Opaque
            }

            fn reflect_marshal_json(&self) -> Option<Result<Vec<u8>, BoxError>> {
                let $v = self;
                Some(quoted(&$text))
            }
        }

        impl Typed for $ty {
            const KIND: LogKind = LogKind::Opaque;
        }
    )*};
}

impl_time!(
    DateTime<Utc> => |v| v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    DateTime<FixedOffset> => |v| v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    DateTime<Local> => |v| v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    NaiveDateTime => |v| v.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true),
    NaiveDate => |v| v.format("%Y-%m-%d").to_string(),
    NaiveTime => |v| v.format("%H:%M:%S%.f").to_string(),
    SystemTime => |v| DateTime::<Utc>::from(*v).to_rfc3339_opts(SecondsFormat::AutoSi, true),
);

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::Loggable;

    #[test]
    fn utc_rfc3339() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 5).unwrap();
        let bytes = t.reflect_marshal_json().unwrap().unwrap();
        assert_eq!(bytes, br#""2025-01-01T12:00:05Z""#);
    }
}
