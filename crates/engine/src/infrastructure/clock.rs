//! Wall-clock source for the session.
//!
//! The only consumer is the export file name, which carries the current UTC
//! date (`essence-config-YYYY-MM-DD.json`). Tests pin the date with
//! [`FixedClock`] or a mocked [`ClockPort`].

use chrono::{DateTime, Utc};

use crate::infrastructure::ports::ClockPort;

/// Reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_real_time() {
        let before = Utc::now();
        let reading = SystemClock.now();
        assert!(reading >= before);
        assert!(reading - before < chrono::Duration::seconds(5));
    }
}
