use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::{DateWindow, MonthCursor};
use crate::notify::{ChangeEvent, Observer, Publisher};

/// The three top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Calendar,
    Journal,
    Tasks,
}

impl View {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            View::Calendar => "Calendar",
            View::Journal => "Journal",
            View::Tasks => "Tasks",
        }
    }
}

/// Holds the current view plus per-view navigation state, so switching
/// away and back preserves the journal's selected day and the
/// calendar's displayed month.
#[derive(Debug)]
pub struct ViewSelector {
    current: View,
    journal: DateWindow,
    calendar: MonthCursor,
    publisher: Publisher,
}

impl ViewSelector {
    /// Starts on the Journal view, with the journal window anchored to
    /// `today` and the calendar showing today's month.
    #[must_use]
    pub fn new(today: NaiveDate, window_days: usize) -> Self {
        Self {
            current: View::Journal,
            journal: DateWindow::trailing(today, window_days),
            calendar: MonthCursor::for_day(today),
            publisher: Publisher::default(),
        }
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.publisher.subscribe(observer);
    }

    #[must_use]
    pub fn current(&self) -> View {
        self.current
    }

    /// Synchronous view switch; a no-op when already current.
    pub fn switch_to(&mut self, view: View) {
        if self.current == view {
            return;
        }
        debug!(from = ?self.current, to = ?view, "switching view");
        self.current = view;
        self.publisher.publish(ChangeEvent::View);
    }

    #[must_use]
    pub fn journal(&self) -> &DateWindow {
        &self.journal
    }

    #[must_use]
    pub fn calendar(&self) -> &MonthCursor {
        &self.calendar
    }

    pub fn select_older_day(&mut self) -> bool {
        let moved = self.journal.select_older();
        if moved {
            self.publisher.publish(ChangeEvent::View);
        }
        moved
    }

    pub fn select_newer_day(&mut self) -> bool {
        let moved = self.journal.select_newer();
        if moved {
            self.publisher.publish(ChangeEvent::View);
        }
        moved
    }

    pub fn previous_month(&mut self) {
        self.calendar.previous_month();
        self.publisher.publish(ChangeEvent::View);
    }

    pub fn next_month(&mut self) {
        self.calendar.next_month();
        self.publisher.publish(ChangeEvent::View);
    }

    /// Snaps the calendar back to the month containing `today`.
    pub fn calendar_to_today(&mut self, today: NaiveDate) {
        let cursor = MonthCursor::for_day(today);
        if self.calendar != cursor {
            self.calendar = cursor;
            self.publisher.publish(ChangeEvent::View);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::NaiveDate;

    use super::{View, ViewSelector};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date")
    }

    #[test]
    fn starts_on_the_journal_view() {
        let selector = ViewSelector::new(today(), 7);
        assert_eq!(selector.current(), View::Journal);
        assert_eq!(selector.journal().len(), 7);
        assert!(selector.calendar().contains(today()));
    }

    #[test]
    fn navigation_state_survives_view_switches() {
        let mut selector = ViewSelector::new(today(), 7);

        selector.select_older_day();
        selector.select_older_day();
        selector.next_month();

        selector.switch_to(View::Tasks);
        selector.switch_to(View::Journal);

        assert_eq!(selector.journal().selected_index(), 2);
        assert_eq!(selector.calendar().month0, 8);
    }

    #[test]
    fn switches_publish_once_and_self_switch_is_silent() {
        let mut selector = ViewSelector::new(today(), 7);
        let events = Rc::new(Cell::new(0));

        let sink = Rc::clone(&events);
        selector.subscribe(Box::new(move |_| sink.set(sink.get() + 1)));

        selector.switch_to(View::Journal);
        assert_eq!(events.get(), 0);

        selector.switch_to(View::Calendar);
        assert_eq!(events.get(), 1);

        selector.previous_month();
        assert_eq!(events.get(), 2);

        // Clamped journal move at the newest day publishes nothing.
        selector.select_newer_day();
        assert_eq!(events.get(), 2);
    }
}
