use chrono::{Datelike, Days, NaiveDate};

use crate::datetime::{days_in_month, first_weekday_offset, month_name};

/// The fixed trailing set of days available for day-by-day journal
/// navigation. Index 0 is the anchor day ("today" at construction),
/// the last index the oldest day. The window is not regenerated as
/// wall-clock time passes within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    days: Vec<NaiveDate>,
    selected: usize,
}

impl DateWindow {
    /// The most recent `len` calendar days ending at `today`, newest
    /// first. A zero `len` is treated as 1 so a selected day always
    /// exists.
    #[must_use]
    pub fn trailing(today: NaiveDate, len: usize) -> Self {
        let len = len.max(1);
        let days = (0..len)
            .map(|offset| {
                today
                    .checked_sub_days(Days::new(offset as u64))
                    .unwrap_or(today)
            })
            .collect();

        Self { days, selected: 0 }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_day(&self) -> NaiveDate {
        self.days[self.selected.min(self.days.len() - 1)]
    }

    #[must_use]
    pub fn anchor_day(&self) -> NaiveDate {
        self.days[0]
    }

    /// Moves the selection one day back in time. Returns whether the
    /// selection moved; at the oldest day this is a no-op.
    pub fn select_older(&mut self) -> bool {
        if self.selected + 1 < self.days.len() {
            self.selected += 1;
            true
        } else {
            false
        }
    }

    /// Moves the selection one day forward in time. Returns whether the
    /// selection moved; at the anchor day this is a no-op.
    pub fn select_newer(&mut self) -> bool {
        if self.selected > 0 {
            self.selected -= 1;
            true
        } else {
            false
        }
    }

    /// True when the newest day is selected; the forward affordance
    /// should render disabled.
    #[must_use]
    pub fn at_newest(&self) -> bool {
        self.selected == 0
    }

    /// True when the oldest day is selected; the backward affordance
    /// should render disabled.
    #[must_use]
    pub fn at_oldest(&self) -> bool {
        self.selected + 1 == self.days.len()
    }
}

/// A single displayed month, navigable without bound in either
/// direction, wrapping year boundaries naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    /// Zero-based month, 0 = January.
    pub month0: u32,
}

impl MonthCursor {
    #[must_use]
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month0: day.month0(),
        }
    }

    pub fn previous_month(&mut self) {
        if self.month0 == 0 {
            self.month0 = 11;
            self.year -= 1;
        } else {
            self.month0 -= 1;
        }
    }

    pub fn next_month(&mut self) {
        if self.month0 == 11 {
            self.month0 = 0;
            self.year += 1;
        } else {
            self.month0 += 1;
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        month_name(self.month0)
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day.year() == self.year && day.month0() == self.month0
    }

    #[must_use]
    pub fn grid(&self) -> MonthGrid {
        MonthGrid {
            leading_blanks: first_weekday_offset(self.year, self.month0),
            day_count: days_in_month(self.year, self.month0),
        }
    }
}

/// Cell layout of a month in a 7-column, Sunday-first grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    /// Blank cells before day 1; equals the weekday index of day 1.
    pub leading_blanks: u32,
    pub day_count: u32,
}

impl MonthGrid {
    /// Cells in row-major order: `None` for leading blanks, then
    /// `Some(day)` for each day of the month.
    pub fn cells(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        let blanks = (0..self.leading_blanks).map(|_| None);
        let days = (1..=self.day_count).map(Some);
        blanks.chain(days)
    }

    /// Number of 7-cell rows needed to show the whole month.
    #[must_use]
    pub fn week_rows(&self) -> u32 {
        (self.leading_blanks + self.day_count).div_ceil(7)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DateWindow, MonthCursor};

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn trailing_window_is_newest_first() {
        let window = DateWindow::trailing(day(2026, 8, 7), 7);
        assert_eq!(window.len(), 7);
        assert_eq!(window.selected_day(), day(2026, 8, 7));
        assert_eq!(window.anchor_day(), day(2026, 8, 7));
    }

    #[test]
    fn window_navigation_clamps_at_both_ends() {
        let mut window = DateWindow::trailing(day(2026, 8, 7), 3);

        assert!(window.at_newest());
        assert!(!window.select_newer());
        assert_eq!(window.selected_index(), 0);

        assert!(window.select_older());
        assert_eq!(window.selected_day(), day(2026, 8, 6));
        assert!(window.select_older());
        assert_eq!(window.selected_day(), day(2026, 8, 5));

        assert!(window.at_oldest());
        assert!(!window.select_older());
        assert_eq!(window.selected_index(), 2);

        assert!(window.select_newer());
        assert_eq!(window.selected_index(), 1);
    }

    #[test]
    fn window_spans_month_boundaries() {
        let mut window = DateWindow::trailing(day(2026, 3, 2), 5);
        while window.select_older() {}
        assert_eq!(window.selected_day(), day(2026, 2, 26));
    }

    #[test]
    fn month_cursor_wraps_years() {
        let mut cursor = MonthCursor {
            year: 2026,
            month0: 0,
        };
        cursor.previous_month();
        assert_eq!((cursor.year, cursor.month0), (2025, 11));

        cursor.next_month();
        assert_eq!((cursor.year, cursor.month0), (2026, 0));

        let mut december = MonthCursor {
            year: 2025,
            month0: 11,
        };
        december.next_month();
        assert_eq!((december.year, december.month0), (2026, 0));
    }

    #[test]
    fn month_grid_counts_blanks_and_days() {
        // February 2024: 29 days, starts on a Thursday.
        let grid = MonthCursor {
            year: 2024,
            month0: 1,
        }
        .grid();
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.day_count, 29);
        assert_eq!(grid.week_rows(), 5);

        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), 33);
        assert_eq!(cells[3], None);
        assert_eq!(cells[4], Some(1));
        assert_eq!(cells[32], Some(29));
    }

    #[test]
    fn cursor_contains_only_its_own_month() {
        let cursor = MonthCursor::for_day(day(2026, 8, 7));
        assert!(cursor.contains(day(2026, 8, 1)));
        assert!(!cursor.contains(day(2026, 7, 31)));
        assert!(!cursor.contains(day(2025, 8, 7)));
    }
}
