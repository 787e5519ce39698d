//! # Pregnancy Date Calculator
//!
//! Pure, stateless date math used by the pregnancy service and the
//! presentation layer: due date derivation, gestational week and trimester.
//!
//! All functions take explicit dates so callers (and tests) control "today".

use chrono::{Duration, NaiveDate};

/// Gestational weeks are clamped to this range
pub const MIN_WEEK: u32 = 1;
pub const MAX_WEEK: u32 = 42;

/// One of the three ~13-week periods of pregnancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// 1, 2 or 3, for display
    pub fn number(&self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }
}

/// Due date from the last menstrual period: LMP + 280 days
pub fn due_date_from_lmp(last_period_date: NaiveDate) -> NaiveDate {
    last_period_date + Duration::days(280)
}

/// Due date from a known conception date: conception + 266 days
pub fn due_date_from_conception(conception_date: NaiveDate) -> NaiveDate {
    conception_date + Duration::days(266)
}

/// Current gestational week: whole weeks elapsed since the last menstrual
/// period, clamped to [1, 42].
pub fn current_week(last_period_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - last_period_date).num_days();
    let week = days.div_euclid(7);
    week.clamp(MIN_WEEK as i64, MAX_WEEK as i64) as u32
}

/// Whole days until the due date, never negative
pub fn days_left(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days().max(0)
}

/// Trimester for a gestational week: weeks 1-13 are the first trimester,
/// 14-27 the second, 28 onward the third.
pub fn trimester(week: u32) -> Trimester {
    if week <= 13 {
        Trimester::First
    } else if week <= 27 {
        Trimester::Second
    } else {
        Trimester::Third
    }
}
