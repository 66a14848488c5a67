//! Delivery hours

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};

/// Zone the delivery window is defined in.
pub const DELIVERY_TIME_ZONE: &str = "Europe/Athens";

/// First local hour in which deliveries are taken.
pub const OPEN_HOUR: i8 = 9;

/// Last local hour in which deliveries are taken (open until midnight).
pub const LAST_HOUR: i8 = 23;

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Local hours during which orders are accepted.
#[derive(Debug, Clone)]
pub struct DeliveryWindow {
    zone: TimeZone,
    open_hour: i8,
    last_hour: i8,
}

impl DeliveryWindow {
    /// Deliveries from 09:00 until midnight, Athens time.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone database has no entry for
    /// [`DELIVERY_TIME_ZONE`].
    pub fn athens() -> Result<Self, jiff::Error> {
        Ok(Self::new(TimeZone::get(DELIVERY_TIME_ZONE)?, OPEN_HOUR, LAST_HOUR))
    }

    /// A window open for local hours `open_hour..=last_hour` in `zone`.
    pub fn new(zone: TimeZone, open_hour: i8, last_hour: i8) -> Self {
        Self {
            zone,
            open_hour,
            last_hour,
        }
    }

    /// Local hour of `at` in the window's zone.
    pub fn local_hour(&self, at: Timestamp) -> i8 {
        at.to_zoned(self.zone.clone()).hour()
    }

    /// Whether orders are accepted at `at`.
    pub fn is_open(&self, at: Timestamp) -> bool {
        (self.open_hour..=self.last_hour).contains(&self.local_hour(at))
    }

    /// User-facing description of the window.
    pub fn notice(&self) -> String {
        let closing = (i16::from(self.last_hour) + 1).rem_euclid(24);

        format!(
            "Deliveries are made from {:02}:00 until {closing:02}:00. \
             Please order again during delivery hours.",
            self.open_hour,
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn athens(hour: i8, minute: i8) -> TestResult<Timestamp> {
        Ok(date(2026, 7, 14)
            .at(hour, minute, 0, 0)
            .in_tz(DELIVERY_TIME_ZONE)?
            .timestamp())
    }

    #[test]
    fn closed_before_nine() -> TestResult {
        let window = DeliveryWindow::athens()?;

        assert!(!window.is_open(athens(8, 59)?));
        assert!(!window.is_open(athens(0, 0)?));

        Ok(())
    }

    #[test]
    fn open_from_nine_until_midnight() -> TestResult {
        let window = DeliveryWindow::athens()?;

        assert!(window.is_open(athens(9, 0)?));
        assert!(window.is_open(athens(15, 30)?));
        assert!(window.is_open(athens(23, 59)?));

        Ok(())
    }

    #[test]
    fn uses_athens_time_not_utc() -> TestResult {
        let window = DeliveryWindow::athens()?;

        // 06:30 UTC is 09:30 in Athens during summer time.
        let at: Timestamp = "2026-07-14T06:30:00Z".parse()?;

        assert_eq!(window.local_hour(at), 9);
        assert!(window.is_open(at));

        Ok(())
    }

    #[test]
    fn fixed_clock_returns_its_instant() -> TestResult {
        let at = athens(12, 0)?;

        assert_eq!(FixedClock(at).now(), at);

        Ok(())
    }

    #[test]
    fn notice_names_the_hours() -> TestResult {
        let notice = DeliveryWindow::athens()?.notice();

        assert!(notice.contains("09:00"));
        assert!(notice.contains("00:00"));

        Ok(())
    }

    #[test]
    fn notice_handles_out_of_range_hours() -> TestResult {
        let window = DeliveryWindow::new(TimeZone::get(DELIVERY_TIME_ZONE)?, 0, i8::MAX);

        assert!(window.notice().contains("until 08:00"));

        let window = DeliveryWindow::new(TimeZone::UTC, 6, -1);

        assert!(window.notice().contains("until 00:00"));

        Ok(())
    }
}
