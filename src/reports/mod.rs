//! Reports module for expense-cli
//!
//! Pure aggregations over a user's expenses: the summary statistics behind
//! the dashboard, a month-by-month view of one year, and spending by day of
//! week. Every report takes the date context explicitly so results are
//! reproducible.

pub mod dashboard;
pub mod monthly;
pub mod summary;
pub mod weekday;

pub use dashboard::DashboardSummary;
pub use monthly::{MonthRow, MonthlyBreakdown};
pub use summary::{CategoryStat, SummaryStats};
pub use weekday::{WeekdayBreakdown, WeekdayRow};

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::config::Settings;

/// "Today" and the week convention that the time windows depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsContext {
    pub today: NaiveDate,
    pub week_start: Weekday,
}

impl StatsContext {
    pub fn new(today: NaiveDate, week_start: Weekday) -> Self {
        Self { today, week_start }
    }

    /// Capture the local date once, with the configured week start
    pub fn current(settings: &Settings) -> Self {
        Self::new(Local::now().date_naive(), settings.week_start())
    }

    pub fn month_start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.today.year(), self.today.month(), 1).unwrap_or(self.today)
    }

    /// Most recent `week_start` day on or before today
    pub fn week_start_date(&self) -> NaiveDate {
        let today = self.today.weekday().num_days_from_sunday();
        let start = self.week_start.num_days_from_sunday();
        let offset = (today + 7 - start) % 7;
        self.today - Duration::days(i64::from(offset))
    }

    /// Whether `date` falls in [first of this month, today]
    pub fn in_current_month(&self, date: NaiveDate) -> bool {
        date >= self.month_start() && date <= self.today
    }

    /// Whether `date` falls in [start of this week, today]
    pub fn in_current_week(&self, date: NaiveDate) -> bool {
        date >= self.week_start_date() && date <= self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_window() {
        let ctx = StatsContext::new(date(2024, 3, 15), Weekday::Sun);
        assert_eq!(ctx.month_start(), date(2024, 3, 1));
        assert!(ctx.in_current_month(date(2024, 3, 1)));
        assert!(ctx.in_current_month(date(2024, 3, 15)));
        assert!(!ctx.in_current_month(date(2024, 3, 16)));
        assert!(!ctx.in_current_month(date(2024, 2, 29)));
    }

    #[test]
    fn test_week_starts_sunday_by_default() {
        // 2024-03-13 is a Wednesday
        let ctx = StatsContext::new(date(2024, 3, 13), Weekday::Sun);
        assert_eq!(ctx.week_start_date(), date(2024, 3, 10));
        assert!(ctx.in_current_week(date(2024, 3, 10)));
        assert!(!ctx.in_current_week(date(2024, 3, 9)));
    }

    #[test]
    fn test_week_start_on_the_day_itself() {
        let sunday = StatsContext::new(date(2024, 3, 10), Weekday::Sun);
        assert_eq!(sunday.week_start_date(), date(2024, 3, 10));

        let monday_start = StatsContext::new(date(2024, 3, 10), Weekday::Mon);
        assert_eq!(monday_start.week_start_date(), date(2024, 3, 4));
    }

    #[test]
    fn test_week_may_span_months() {
        // 2024-03-01 is a Friday
        let ctx = StatsContext::new(date(2024, 3, 1), Weekday::Sun);
        assert_eq!(ctx.week_start_date(), date(2024, 2, 25));
        assert!(ctx.in_current_week(date(2024, 2, 26)));
        assert!(!ctx.in_current_month(date(2024, 2, 26)));
    }
}
