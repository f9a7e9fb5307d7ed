//! Wall-clock provider read by the time check.

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Source of the current wall-clock time.
///
/// Implementations never fail; a host without a usable clock is unhealthy, which is not a
/// workflow concern.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the system clock in a single UTC offset fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Captures the host's current local offset. Later zone changes (DST) are not followed.
    pub fn local() -> Self {
        Self {
            offset: *Local::now().offset(),
        }
    }

    /// Pins the clock to `offset` regardless of the host zone.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Always returns the same instant. Used for rehearsals (`nudge run --at`) and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_clock_reports_in_configured_zone() {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid offset");
        let now = SystemClock::with_offset(offset).now();
        assert_eq!(now.offset(), &offset);
    }

    #[test]
    fn local_clock_keeps_offset_captured_at_construction() {
        let clock = SystemClock::local();
        let captured = clock.offset();

        let first = clock.now();
        let second = clock.now();

        assert_eq!(first.offset(), &captured);
        assert_eq!(second.offset(), &captured);
    }

    #[test]
    fn fixed_clock_is_stable() {
        let instant = DateTime::parse_from_rfc3339("2024-03-04T14:00:00+01:00").expect("timestamp");
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}
