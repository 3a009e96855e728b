//! Spending by day of week (Sunday through Saturday)

use chrono::{Datelike, Weekday};
use serde::Serialize;

use crate::models::{Expense, Money};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayRow {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub total: Money,
    pub count: usize,
}

fn serialize_weekday<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

impl WeekdayRow {
    /// Mean amount per expense on this day, `None` when there are none
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total.as_f64() / self.count as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBreakdown {
    /// Seven rows, Sunday first
    pub days: Vec<WeekdayRow>,
}

impl WeekdayBreakdown {
    pub fn from_records(records: &[Expense]) -> Self {
        let mut days: Vec<WeekdayRow> = WEEKDAYS
            .iter()
            .map(|&weekday| WeekdayRow {
                weekday,
                total: Money::zero(),
                count: 0,
            })
            .collect();

        for expense in records {
            let row = &mut days[expense.date.weekday().num_days_from_sunday() as usize];
            row.total += expense.counted_amount();
            row.count += 1;
        }

        Self { days }
    }

    /// Day with the highest average spend
    pub fn busiest(&self) -> Option<&WeekdayRow> {
        self.days
            .iter()
            .filter_map(|d| d.average().map(|avg| (d, avg)))
            .fold(None, |best: Option<(&WeekdayRow, f64)>, (d, avg)| match best {
                Some((_, b)) if b >= avg => best,
                _ => Some((d, avg)),
            })
            .map(|(d, _)| d)
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{:<10} {:>14} {:>7} {:>14}\n",
            "Day", "Total", "Count", "Average"
        ));
        output.push_str(&"-".repeat(48));
        output.push('\n');

        for day in &self.days {
            let average = match day.average() {
                Some(avg) => format!("{}{:.2}", currency, avg),
                None => "-".to_string(),
            };
            output.push_str(&format!(
                "{:<10} {:>14} {:>7} {:>14}\n",
                weekday_name(day.weekday),
                day.total.format_with_symbol(currency),
                day.count,
                average
            ));
        }

        output
    }
}
