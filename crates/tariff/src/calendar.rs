use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::kind::VisitKind;

/// From this Moscow hour on, a next-day visit counts as urgent.
pub const URGENT_TOMORROW_HOUR: u32 = 17;

const MOSCOW_UTC_OFFSET_HOURS: i64 = 3;

/// Fixed-date Russian public holidays as (month, day).
const HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (1, 5),
    (1, 6),
    (1, 7),
    (1, 8),
    (2, 23),
    (3, 8),
    (5, 1),
    (5, 9),
    (6, 12),
    (11, 4),
];

/// Source of the current Moscow wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// System time shifted to Moscow (UTC+3).
#[derive(Debug, Clone, Copy, Default)]
pub struct MoscowClock;

impl Clock for MoscowClock {
    fn now(&self) -> NaiveDateTime {
        moscow_now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// `None` for an impossible date or time.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, minute, 0)
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn moscow_now() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::hours(MOSCOW_UTC_OFFSET_HOURS)
}

pub fn is_holiday(date: NaiveDate) -> bool {
    HOLIDAYS.contains(&(date.month(), date.day()))
}

/// Visit kind for a chosen date at Moscow time `now`.
pub fn classify(date: NaiveDate, now: NaiveDateTime) -> VisitKind {
    let today = now.date();
    if is_holiday(date) {
        VisitKind::Holiday
    } else if date == today {
        VisitKind::UrgentToday
    } else if Some(date) == today.succ_opt() && now.hour() >= URGENT_TOMORROW_HOUR {
        VisitKind::UrgentTomorrow
    } else {
        VisitKind::Exact
    }
}
