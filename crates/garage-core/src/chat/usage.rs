//! Daily chat usage governor.
//!
//! The counter is held by the client and scoped to its local calendar date.
//! The server never sees it, so it only throttles well-behaved clients.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum chat turns per calendar day.
pub const DAILY_LIMIT: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub date: Option<NaiveDate>,
    pub count: u32,
}

impl DailyUsage {
    /// Turns already used on `today`. A stale date counts as zero.
    pub fn used_on(&self, today: NaiveDate) -> u32 {
        if self.date == Some(today) { self.count } else { 0 }
    }

    pub fn allows(&self, today: NaiveDate) -> bool {
        self.used_on(today) < DAILY_LIMIT
    }

    pub fn remaining(&self, today: NaiveDate) -> u32 {
        DAILY_LIMIT.saturating_sub(self.used_on(today))
    }

    /// Count one successful turn, resetting first if the date rolled over.
    pub fn record(&mut self, today: NaiveDate) {
        if self.date != Some(today) {
            self.date = Some(today);
            self.count = 0;
        }
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_record_increments_by_one() {
        let mut usage = DailyUsage::default();
        assert_eq!(usage.used_on(day(1)), 0);

        usage.record(day(1));
        assert_eq!(usage.used_on(day(1)), 1);
        usage.record(day(1));
        assert_eq!(usage.used_on(day(1)), 2);
        assert_eq!(usage.remaining(day(1)), DAILY_LIMIT - 2);
    }

    #[test]
    fn test_resets_when_date_changes() {
        let mut usage = DailyUsage::default();
        for _ in 0..10 {
            usage.record(day(1));
        }
        assert_eq!(usage.used_on(day(2)), 0);

        usage.record(day(2));
        assert_eq!(usage.date, Some(day(2)));
        assert_eq!(usage.count, 1);
    }

    #[test]
    fn test_blocks_at_limit() {
        let mut usage = DailyUsage::default();
        for _ in 0..DAILY_LIMIT - 1 {
            usage.record(day(1));
        }
        assert!(usage.allows(day(1)));

        usage.record(day(1));
        assert!(!usage.allows(day(1)));
        assert_eq!(usage.remaining(day(1)), 0);
        assert!(usage.allows(day(2)));
    }
}
