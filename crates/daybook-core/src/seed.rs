use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::entry::{Task, Thought};
use crate::store::EntryStore;

/// Embedded sample data, stored as hour offsets so the fixtures land
/// on whatever day they are anchored to.
const SEED_JSON: &str = include_str!("seed.json");

#[derive(Debug, Deserialize)]
struct SeedFile {
    thoughts: Vec<SeedThought>,
    tasks: Vec<SeedTask>,
}

#[derive(Debug, Deserialize)]
struct SeedThought {
    content: String,
    #[serde(default)]
    hours_ago: i64,
}

#[derive(Debug, Deserialize)]
struct SeedTask {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_in_hours: Option<i64>,
    #[serde(default)]
    created_hours_ago: i64,
    #[serde(default)]
    is_completed: bool,
}

fn parse() -> anyhow::Result<SeedFile> {
    serde_json::from_str(SEED_JSON).context("embedded seed fixture is malformed")
}

/// Sample thoughts with their offsets applied backwards from `anchor`.
pub fn sample_thoughts(anchor: DateTime<Utc>) -> anyhow::Result<Vec<Thought>> {
    let file = parse()?;
    Ok(file
        .thoughts
        .into_iter()
        .map(|seed| Thought::new(seed.content, anchor - Duration::hours(seed.hours_ago)))
        .collect())
}

/// Sample tasks relative to `anchor`.
pub fn sample_tasks(anchor: DateTime<Utc>) -> anyhow::Result<Vec<Task>> {
    let file = parse()?;
    Ok(file
        .tasks
        .into_iter()
        .map(|seed| {
            let mut task = Task::new(
                seed.title,
                anchor - Duration::hours(seed.created_hours_ago),
            );
            task.description = seed.description;
            task.due_date = seed.due_in_hours.map(|hours| anchor + Duration::hours(hours));
            task.is_completed = seed.is_completed;
            task
        })
        .collect())
}

/// Fills a fresh session the way the prototype boots: a handful of
/// thoughts on the anchor day plus a short task list.
#[tracing::instrument(skip(store))]
pub fn populate(store: &mut EntryStore, now: DateTime<Utc>) -> anyhow::Result<()> {
    for thought in sample_thoughts(now)? {
        store.insert_thought(thought);
    }
    for task in sample_tasks(now)? {
        store.insert_task(task);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{sample_tasks, sample_thoughts};
    use crate::store::EntryStore;

    fn anchor() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 18, 0, 0)
            .single()
            .expect("valid anchor")
    }

    #[test]
    fn thoughts_land_on_the_anchor_day() {
        let thoughts = sample_thoughts(anchor()).expect("seed thoughts");
        assert_eq!(thoughts.len(), 3);
        assert_eq!(thoughts[0].timestamp, anchor());
        assert_eq!(thoughts[2].timestamp, anchor() - Duration::hours(2));
        assert!(thoughts.iter().all(|t| !t.content.trim().is_empty()));
    }

    #[test]
    fn tasks_cover_both_completion_states() {
        let tasks = sample_tasks(anchor()).expect("seed tasks");
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().any(|t| t.is_completed));
        assert!(tasks.iter().any(|t| !t.is_completed));
        assert!(tasks.iter().any(|t| t.due_date.is_some()));
    }

    #[test]
    fn populate_fills_an_empty_store() {
        let mut store = EntryStore::new();
        super::populate(&mut store, anchor()).expect("populate");
        assert_eq!(store.thoughts().len(), 3);
        assert_eq!(store.tasks().len(), 3);
    }
}
