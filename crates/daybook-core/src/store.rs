use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::datetime::local_day;
use crate::entry::{Task, Thought};
use crate::error::StoreError;
use crate::extract::TaskCandidate;
use crate::notify::{ChangeEvent, Observer, Publisher};

/// In-memory session store for thoughts and tasks. All entry state
/// lives here and is discarded when the process exits.
#[derive(Debug, Default)]
pub struct EntryStore {
    thoughts: Vec<Thought>,
    tasks: Vec<Task>,
    publisher: Publisher,
}

impl EntryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.publisher.subscribe(observer);
    }

    #[must_use]
    pub fn thoughts(&self) -> &[Thought] {
        &self.thoughts
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Appends a new thought stamped with `now`. Rejects empty or
    /// whitespace-only content; the stored content is trimmed.
    #[tracing::instrument(skip(self, content))]
    pub fn add_thought(
        &mut self,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Uuid, StoreError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let thought = Thought::new(trimmed.to_string(), now);
        let id = thought.id;
        self.thoughts.push(thought);

        info!(%id, total = self.thoughts.len(), "added thought");
        self.publisher.publish(ChangeEvent::Thoughts);
        Ok(id)
    }

    /// Replaces a thought's content in place, keeping its id and
    /// timestamp. Backs the journal's Edit affordance.
    #[tracing::instrument(skip(self, content), fields(id = %id))]
    pub fn update_thought(&mut self, id: Uuid, content: &str) -> Result<(), StoreError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let thought = self
            .thoughts
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::ThoughtNotFound(id))?;

        thought.content = trimmed.to_string();
        debug!(%id, "updated thought content");
        self.publisher.publish(ChangeEvent::Thoughts);
        Ok(())
    }

    /// Removes every thought whose timestamp falls on `day`, returning
    /// the removed count. Backs the journal's Clear affordance.
    #[tracing::instrument(skip(self))]
    pub fn clear_day(&mut self, day: NaiveDate) -> usize {
        let before = self.thoughts.len();
        self.thoughts.retain(|t| local_day(t.timestamp) != day);
        let removed = before - self.thoughts.len();

        info!(%day, removed, "cleared day");
        if removed > 0 {
            self.publisher.publish(ChangeEvent::Thoughts);
        }
        removed
    }

    /// Thoughts whose timestamp falls on the same calendar day as
    /// `day`, in insertion order. Day equality is exact year, month
    /// and day in the project timezone, never an elapsed-time window.
    #[must_use]
    pub fn thoughts_for_day(&self, day: NaiveDate) -> Vec<&Thought> {
        self.thoughts
            .iter()
            .filter(|t| local_day(t.timestamp) == day)
            .collect()
    }

    /// Flips a task's completion flag and returns the new value.
    /// An absent id is an error rather than a silent no-op, matching
    /// the documented taxonomy.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle_task(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))?;

        task.is_completed = !task.is_completed;
        let now_completed = task.is_completed;

        debug!(%id, completed = now_completed, "toggled task");
        self.publisher.publish(ChangeEvent::Tasks);
        Ok(now_completed)
    }

    /// Splits tasks into (incomplete, completed), preserving each
    /// side's relative order from the underlying collection.
    #[must_use]
    pub fn partition_tasks(&self) -> (Vec<&Task>, Vec<&Task>) {
        self.tasks.iter().partition(|t| !t.is_completed)
    }

    /// Converts extraction output rows into tasks appended to the
    /// collection, linked back to the thought they came from.
    #[tracing::instrument(skip(self, candidates))]
    pub fn ingest_candidates(
        &mut self,
        candidates: Vec<TaskCandidate>,
        thought_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> usize {
        let mut added = 0;
        for candidate in candidates {
            let title = candidate.title.trim();
            if title.is_empty() {
                continue;
            }

            let mut task = Task::new(title.to_string(), now);
            task.description = candidate.description;
            task.due_date = candidate.due_date;
            task.thought_id = thought_id;
            self.tasks.push(task);
            added += 1;
        }

        info!(added, total = self.tasks.len(), "ingested extracted tasks");
        if added > 0 {
            self.publisher.publish(ChangeEvent::Tasks);
        }
        added
    }

    /// Appends a pre-built thought, bypassing validation. Seed fixtures
    /// only.
    pub fn insert_thought(&mut self, thought: Thought) {
        self.thoughts.push(thought);
        self.publisher.publish(ChangeEvent::Thoughts);
    }

    /// Appends a pre-built task, bypassing validation. Seed fixtures
    /// only.
    pub fn insert_task(&mut self, task: Task) {
        self.tasks.push(task);
        self.publisher.publish(ChangeEvent::Tasks);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::{Duration, TimeZone, Utc};

    use super::EntryStore;
    use crate::entry::Task;
    use crate::error::StoreError;
    use crate::extract::TaskCandidate;
    use crate::notify::ChangeEvent;

    fn fixed_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 15, 30, 0)
            .single()
            .expect("valid now")
    }

    #[test]
    fn add_thought_trims_and_stamps() {
        let mut store = EntryStore::new();
        let now = fixed_now();

        let id = store
            .add_thought("  remember the milk  ", now)
            .expect("add thought");

        assert_eq!(store.thoughts().len(), 1);
        assert_eq!(store.thoughts()[0].id, id);
        assert_eq!(store.thoughts()[0].content, "remember the milk");
        assert_eq!(store.thoughts()[0].timestamp, now);
    }

    #[test]
    fn add_thought_rejects_blank_content() {
        let mut store = EntryStore::new();

        assert_eq!(
            store.add_thought("   \n\t ", fixed_now()),
            Err(StoreError::EmptyContent)
        );
        assert!(store.thoughts().is_empty());
    }

    #[test]
    fn double_toggle_restores_completion() {
        let mut store = EntryStore::new();
        let task = Task::new("water the plants".to_string(), fixed_now());
        let id = task.id;
        store.insert_task(task);

        assert_eq!(store.toggle_task(id), Ok(true));
        assert_eq!(store.toggle_task(id), Ok(false));
        assert!(!store.tasks()[0].is_completed);
    }

    #[test]
    fn toggle_unknown_task_is_an_error() {
        let mut store = EntryStore::new();
        let ghost = uuid::Uuid::new_v4();
        assert_eq!(store.toggle_task(ghost), Err(StoreError::TaskNotFound(ghost)));
    }

    #[test]
    fn day_filter_uses_exact_calendar_days() {
        let mut store = EntryStore::new();
        let now = fixed_now();

        store.add_thought("today, afternoon", now).expect("add");
        store
            .add_thought("today, at midnight", now - Duration::hours(15) - Duration::minutes(30))
            .expect("add");
        store
            .add_thought("late yesterday", now - Duration::hours(16))
            .expect("add");

        let today = crate::datetime::day_in(now, &chrono_tz::UTC);
        let found = store.thoughts_for_day(today);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].content, "today, afternoon");
        assert_eq!(found[1].content, "today, at midnight");
    }

    #[test]
    fn partition_covers_every_task_once() {
        let mut store = EntryStore::new();
        let now = fixed_now();

        for i in 0..5 {
            let mut task = Task::new(format!("task {i}"), now);
            task.is_completed = i % 2 == 0;
            store.insert_task(task);
        }

        let (active, done) = store.partition_tasks();
        assert_eq!(active.len() + done.len(), store.tasks().len());
        assert_eq!(active.len(), 2);
        assert_eq!(done.len(), 3);
        assert!(active.iter().all(|t| !t.is_completed));
        assert!(done.iter().all(|t| t.is_completed));
        // Relative order within each side is preserved.
        assert_eq!(active[0].title, "task 1");
        assert_eq!(done[0].title, "task 0");
    }

    #[test]
    fn clear_day_removes_only_that_day() {
        let mut store = EntryStore::new();
        let now = fixed_now();

        store.add_thought("keep me", now - Duration::days(1)).expect("add");
        store.add_thought("clear me", now).expect("add");

        let today = crate::datetime::day_in(now, &chrono_tz::UTC);
        assert_eq!(store.clear_day(today), 1);
        assert_eq!(store.thoughts().len(), 1);
        assert_eq!(store.thoughts()[0].content, "keep me");
    }

    #[test]
    fn update_thought_keeps_id_and_timestamp() {
        let mut store = EntryStore::new();
        let now = fixed_now();
        let id = store.add_thought("draft", now).expect("add");

        store.update_thought(id, "  final  ").expect("update");

        assert_eq!(store.thoughts()[0].content, "final");
        assert_eq!(store.thoughts()[0].id, id);
        assert_eq!(store.thoughts()[0].timestamp, now);

        assert_eq!(
            store.update_thought(id, "  "),
            Err(StoreError::EmptyContent)
        );
    }

    #[test]
    fn ingest_links_tasks_to_their_thought() {
        let mut store = EntryStore::new();
        let now = fixed_now();
        let thought_id = store.add_thought("call mom and pay rent", now).expect("add");

        let added = store.ingest_candidates(
            vec![
                TaskCandidate::titled("Call mom"),
                TaskCandidate::titled("Pay rent"),
                TaskCandidate::titled("   "),
            ],
            Some(thought_id),
            now,
        );

        assert_eq!(added, 2);
        assert_eq!(store.tasks().len(), 2);
        assert!(store.tasks().iter().all(|t| t.thought_id == Some(thought_id)));
        assert!(store.tasks().iter().all(|t| !t.is_completed));
    }

    #[test]
    fn mutations_notify_subscribers() {
        let mut store = EntryStore::new();
        let thought_events = Rc::new(Cell::new(0));
        let task_events = Rc::new(Cell::new(0));

        let thoughts = Rc::clone(&thought_events);
        let tasks = Rc::clone(&task_events);
        store.subscribe(Box::new(move |event| match event {
            ChangeEvent::Thoughts => thoughts.set(thoughts.get() + 1),
            ChangeEvent::Tasks => tasks.set(tasks.get() + 1),
            ChangeEvent::View => {}
        }));

        let now = fixed_now();
        let id = store.add_thought("note", now).expect("add");
        store.update_thought(id, "edited").expect("update");
        store.ingest_candidates(vec![TaskCandidate::titled("do it")], Some(id), now);

        assert_eq!(thought_events.get(), 2);
        assert_eq!(task_events.get(), 1);
    }
}
