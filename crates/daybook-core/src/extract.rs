use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ExtractError;

/// One structured task proposed by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCandidate {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskCandidate {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
        }
    }
}

/// The boundary to whatever turns free text into task candidates.
/// Input is raw text; output is a sequence of candidates or a failure
/// saying extraction could not be performed.
pub trait Extractor: Send + Sync {
    fn extract(&self, content: &str) -> Result<Vec<TaskCandidate>, ExtractError>;
}

/// Phrases that mark prose as carrying actionable items.
const TASK_INDICATORS: &[&str] = &[
    "need to",
    "must",
    "should",
    "todo",
    "to do",
    "task",
    "buy",
    "remember to",
    "don't forget",
    "have to",
    "get",
    "pickup",
    "pick up",
    "call",
    "email",
    "contact",
    "schedule",
    "meet",
    "appointment",
    "deadline",
    "finish",
    "complete",
    "start",
    "begin",
    "send",
    "pay",
    "make",
    "plan",
    "check",
    "review",
    "update",
    "organize",
    "clean",
    "fix",
    "prepare",
    "go to",
    "visit",
    "work on",
    "look at",
    "find",
    "search",
    "apply",
    "figure out",
    "talk",
    "discuss",
    "follow up",
    "arrange",
    "order",
];

const DELIMITERS: &[&str] = &[". ", ".\n", ", ", "; ", "\n", " and ", " then ", " also "];

/// Content shorter than this is taken whole as a single candidate.
const SHORT_CONTENT_LIMIT: usize = 100;

const TITLE_LIMIT: usize = 150;

/// Heuristic extractor: list items first, then indicator-driven
/// splitting, then sentence fallback. Stands in until a model-backed
/// extractor exists behind the same trait.
pub struct RuleBasedExtractor {
    numbered_item: Regex,
    bulleted_item: Regex,
    sentence: Regex,
}

impl RuleBasedExtractor {
    pub fn new() -> anyhow::Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| anyhow!("internal regex compile failure: {e}"))
        };

        Ok(Self {
            numbered_item: compile(r"(?m)^\s*\d+[.)]\s+(.+)$")?,
            bulleted_item: compile(r"(?m)^\s*[-–•*+]\s+(.+)$")?,
            sentence: compile(r"[^.!?]+[.!?]+")?,
        })
    }

    fn list_items(&self, content: &str) -> Vec<String> {
        let mut items = Vec::new();
        for regex in [&self.numbered_item, &self.bulleted_item] {
            for captures in regex.captures_iter(content) {
                if let Some(item) = captures.get(1) {
                    let item = item.as_str().trim();
                    if !item.is_empty() {
                        items.push(item.to_string());
                    }
                }
            }
        }
        items
    }

    fn sentences(&self, content: &str) -> Vec<String> {
        self.sentence
            .find_iter(content)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| s.split_whitespace().count() > 2)
            .collect()
    }
}

impl Extractor for RuleBasedExtractor {
    #[tracing::instrument(skip(self, content))]
    fn extract(&self, content: &str) -> Result<Vec<TaskCandidate>, ExtractError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ExtractError::NoContent);
        }

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        let list_items = self.list_items(content);
        if !list_items.is_empty() {
            for item in list_items {
                push_unique(&mut candidates, &mut seen, item);
            }
            debug!(count = candidates.len(), "extracted list items");
            return Ok(candidates);
        }

        if content.chars().count() < SHORT_CONTENT_LIMIT {
            return Ok(vec![TaskCandidate::titled(content)]);
        }

        let lowered = content.to_lowercase();
        let has_indicator = TASK_INDICATORS
            .iter()
            .any(|indicator| lowered.contains(indicator));

        if !has_indicator {
            for sentence in self.sentences(content) {
                let chars = sentence.chars().count();
                if chars > 5 && chars < TITLE_LIMIT {
                    push_unique(&mut candidates, &mut seen, sentence);
                }
            }
            if candidates.is_empty() {
                candidates.push(TaskCandidate::titled(truncate_title(content)));
            }
            debug!(count = candidates.len(), "extracted sentences");
            return Ok(candidates);
        }

        let parts: Vec<String> = match best_delimiter(content) {
            Some(delimiter) => content.split(delimiter).map(str::to_string).collect(),
            None => vec![content.to_string()],
        };

        for part in parts {
            let part = part.trim();
            if part.chars().count() < 3 {
                continue;
            }
            push_unique(&mut candidates, &mut seen, tidy_title(part));
        }

        debug!(count = candidates.len(), "extracted delimited parts");
        Ok(candidates)
    }
}

fn push_unique(candidates: &mut Vec<TaskCandidate>, seen: &mut HashSet<String>, title: String) {
    let key = title.to_lowercase();
    if title.is_empty() || !seen.insert(key) {
        return;
    }
    candidates.push(TaskCandidate::titled(title));
}

/// Capitalizes the first letter and strips a trailing period.
fn tidy_title(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('.');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_title(content: &str) -> String {
    if content.chars().count() <= TITLE_LIMIT {
        return content.to_string();
    }
    let mut title: String = content.chars().take(TITLE_LIMIT).collect();
    title.push_str("...");
    title
}

/// Picks the delimiter that splits content into the most parts of a
/// reasonable average length.
fn best_delimiter(content: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, i64)> = None;

    for &delimiter in DELIMITERS {
        if !content.contains(delimiter) {
            continue;
        }

        let parts: Vec<&str> = content
            .split(delimiter)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() < 2 {
            continue;
        }

        let avg_len = parts.iter().map(|p| p.chars().count()).sum::<usize>() / parts.len();
        let mut score = parts.len() as i64 * 10;
        if (5..=100).contains(&avg_len) {
            score += 50;
        } else {
            score -= 20;
        }

        if score > best.map_or(0, |(_, s)| s) {
            best = Some((delimiter, score));
        }
    }

    best.map(|(delimiter, _)| delimiter)
}

/// Completion message from the extraction worker. `generation` names
/// the intake lifetime that requested the work; the receiver drops
/// outcomes whose generation is no longer current.
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub generation: u64,
    pub result: Result<Vec<TaskCandidate>, ExtractError>,
}

/// Runs extraction on a worker thread after a fixed delay standing in
/// for real model latency. The only suspension point in the system;
/// the worker communicates solely through the channel.
pub fn spawn_extraction(
    extractor: Arc<dyn Extractor>,
    content: String,
    generation: u64,
    delay: Duration,
    sender: Sender<ExtractionOutcome>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        thread::sleep(delay);
        let result = extractor.extract(&content);
        debug!(generation, ok = result.is_ok(), "extraction finished");
        if sender.send(ExtractionOutcome { generation, result }).is_err() {
            warn!(generation, "extraction receiver gone; dropping outcome");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::time::Duration;

    use super::{Extractor, RuleBasedExtractor, spawn_extraction};
    use crate::error::ExtractError;

    fn extractor() -> RuleBasedExtractor {
        RuleBasedExtractor::new().expect("compile extractor")
    }

    #[test]
    fn blank_content_cannot_be_extracted() {
        assert_eq!(extractor().extract("  \n "), Err(ExtractError::NoContent));
    }

    #[test]
    fn list_items_win_over_everything_else() {
        let content = "Things for tomorrow:\n1. Buy groceries\n2. Call the dentist\n- Water plants\n- water plants";
        let candidates = extractor().extract(content).expect("extract");

        let titles: Vec<_> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy groceries", "Call the dentist", "Water plants"]);
    }

    #[test]
    fn short_content_becomes_one_candidate() {
        let candidates = extractor().extract("grab coffee with Ana").expect("extract");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "grab coffee with Ana");
        assert!(candidates[0].description.is_none());
        assert!(candidates[0].due_date.is_none());
    }

    #[test]
    fn indicator_prose_splits_on_the_best_delimiter() {
        let content = "I really need to email the landlord about the broken heater. \
                       Also I should schedule a vet appointment for the cat. \
                       Don't forget to pay the electricity bill before Friday.";
        let candidates = extractor().extract(content).expect("extract");

        assert!(candidates.len() >= 2);
        assert!(candidates.iter().all(|c| !c.title.ends_with('.')));
        assert!(
            candidates
                .iter()
                .all(|c| c.title.chars().next().is_some_and(|ch| !ch.is_lowercase()))
        );
    }

    #[test]
    fn worker_reports_through_the_channel() {
        let (tx, rx) = mpsc::channel();
        let extractor: Arc<dyn Extractor> = Arc::new(extractor());

        let handle = spawn_extraction(
            extractor,
            "buy stamps".to_string(),
            7,
            Duration::from_millis(0),
            tx,
        );

        let outcome = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker outcome");
        assert_eq!(outcome.generation, 7);
        let candidates = outcome.result.expect("extraction result");
        assert_eq!(candidates[0].title, "buy stamps");

        handle.join().expect("worker join");
    }
}
