use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar window used to filter transactions by date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn day(reference: NaiveDate) -> Self {
        Self {
            start: reference,
            end: reference,
        }
    }

    /// Monday through Sunday of the week containing `reference`.
    pub fn week(reference: NaiveDate) -> Self {
        let delta = u64::from(reference.weekday().num_days_from_monday());
        let start = reference
            .checked_sub_days(Days::new(delta))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start,
            end: start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
        }
    }

    /// First through last calendar day of the month containing `reference`.
    pub fn month(reference: NaiveDate) -> Self {
        let start = reference.with_day(1).unwrap_or(reference);
        let last = days_in_month(reference.year(), reference.month());
        let end = reference.with_day(last).unwrap_or(reference);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Which windows were requested on a summary; the narrowest one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    pub day: bool,
    pub week: bool,
    pub month: bool,
}

impl SummaryFilter {
    pub fn window(&self, reference: NaiveDate) -> Option<DateWindow> {
        if self.day {
            Some(DateWindow::day(reference))
        } else if self.week {
            Some(DateWindow::week(reference))
        } else if self.month {
            Some(DateWindow::month(reference))
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        if self.day {
            "today"
        } else if self.week {
            "this week"
        } else if self.month {
            "this month"
        } else {
            "all time"
        }
    }
}

/// Moves `date` by whole months, clamping the day to the target month's end.
/// `None` when the result falls outside the representable calendar.
pub(crate) fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        return 31;
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2023-10-31 is a Tuesday.
        let window = DateWindow::week(date(2023, 10, 31));
        assert_eq!(window.start, date(2023, 10, 30));
        assert_eq!(window.end, date(2023, 11, 5));
        assert!(window.contains(date(2023, 11, 5)));
        assert!(!window.contains(date(2023, 10, 29)));
    }

    #[test]
    fn week_of_a_sunday_starts_on_previous_monday() {
        let window = DateWindow::week(date(2023, 10, 29));
        assert_eq!(window.start, date(2023, 10, 23));
        assert_eq!(window.end, date(2023, 10, 29));
    }

    #[test]
    fn month_covers_leap_february() {
        let window = DateWindow::month(date(2024, 2, 10));
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 2, 29));
    }

    #[test]
    fn filter_prefers_day_over_week_and_month() {
        let filter = SummaryFilter {
            day: true,
            week: true,
            month: true,
        };
        let reference = date(2023, 10, 31);
        assert_eq!(filter.window(reference), Some(DateWindow::day(reference)));

        let filter = SummaryFilter {
            day: false,
            week: true,
            month: true,
        };
        assert_eq!(filter.window(reference), Some(DateWindow::week(reference)));
        assert_eq!(SummaryFilter::default().window(reference), None);
    }

    #[test]
    fn shift_month_wraps_years() {
        assert_eq!(shift_month(date(2023, 12, 31), 2), Some(date(2024, 2, 29)));
        assert_eq!(shift_month(date(2024, 1, 15), -1), Some(date(2023, 12, 15)));
        assert_eq!(shift_month(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn week_window_stays_inside_the_calendar() {
        let window = DateWindow::week(NaiveDate::MAX);
        assert_eq!(window.end, NaiveDate::MAX);
        assert!(window.contains(NaiveDate::MAX));
        assert_eq!(DateWindow::week(NaiveDate::MIN).start, NaiveDate::MIN);
    }
}
