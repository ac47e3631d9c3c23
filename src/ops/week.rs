use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::model::Task;

const SHORT_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
const FULL_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Day index within a Monday-based week (0 = Monday), accepting short or
/// full weekday names.
pub fn day_index(name: &str) -> Option<usize> {
    let lower = name.to_ascii_lowercase();
    SHORT_NAMES
        .iter()
        .position(|d| *d == lower)
        .or_else(|| FULL_NAMES.iter().position(|d| *d == lower))
}

pub fn weekday_at(index: usize) -> Option<Weekday> {
    const DAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    DAYS.get(index).copied()
}

/// The dates of the week containing `today`, Monday through Sunday.
pub fn week_dates(today: NaiveDate) -> [NaiveDate; 7] {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// Tasks created on `date`, preserving the order given.
pub fn tasks_on<'a>(tasks: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.created_at.date_naive() == date)
        .collect()
}

/// Which task a freshly focused day highlights: the next-to-last one when
/// there are two or more, otherwise the only one.
pub fn focus_task<'a>(day_tasks: &[&'a Task]) -> Option<&'a Task> {
    match day_tasks.len() {
        0 => None,
        1 => Some(day_tasks[0]),
        n => Some(day_tasks[n - 2]),
    }
}
