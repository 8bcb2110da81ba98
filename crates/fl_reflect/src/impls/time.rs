use core::time::Duration;

use crate::{LogKind, LogRef, Loggable, Typed};

/// Durations read as signed nanoseconds, saturating at `i64::MAX`.
impl Loggable for Duration {
    #[inline]
    fn as_loggable(&self) -> &dyn Loggable {
        self
    }

    #[inline]
    fn log_ref(&self) -> LogRef<'_> {
        LogRef::Int(i64::try_from(self.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl Typed for Duration {
    const KIND: LogKind = LogKind::Int;
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use crate::{LogRef, Loggable};

    #[test]
    fn duration_as_nanos() {
        let d = Duration::from_millis(1500);
        assert!(matches!(d.log_ref(), LogRef::Int(1_500_000_000)));
        assert!(matches!(Duration::MAX.log_ref(), LogRef::Int(i64::MAX)));
    }
}
