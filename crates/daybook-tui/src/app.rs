use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};
use uuid::Uuid;

use daybook_core::config::Config;
use daybook_core::datetime;
use daybook_core::entry::Thought;
use daybook_core::extract::{
    ExtractionOutcome, Extractor, RuleBasedExtractor, spawn_extraction,
};
use daybook_core::intake::Intake;
use daybook_core::seed;
use daybook_core::store::EntryStore;
use daybook_core::view::{View, ViewSelector};

/// Content waiting on an in-flight extraction. Dropped unapplied when
/// its generation goes stale.
#[derive(Debug)]
struct PendingSubmit {
    generation: u64,
    content: String,
}

/// Whole-session UI state: the core session plus surface concerns
/// (cursors, dialog visibility, splash timer).
pub struct App {
    pub store: EntryStore,
    pub selector: ViewSelector,
    pub intake: Intake,
    pub dialog_open: bool,
    pub journal_cursor: usize,
    pub task_cursor: usize,
    pub tick_count: u64,
    pub should_quit: bool,
    /// Set by core change notifications and input; the loop redraws
    /// when it is up.
    pub redraw: Rc<Cell<bool>>,
    splash_until: Option<Instant>,
    intake_delay: Duration,
    extractor: Arc<dyn Extractor>,
    outcome_tx: Sender<ExtractionOutcome>,
    pending: Option<PendingSubmit>,
}

impl App {
    pub fn new(
        cfg: &Config,
        no_splash: bool,
        outcome_tx: Sender<ExtractionOutcome>,
    ) -> anyhow::Result<Self> {
        let now = Utc::now();
        let today = datetime::local_day(now);

        let mut store = EntryStore::new();
        seed::populate(&mut store, now).context("failed to load seed fixtures")?;

        let mut selector = ViewSelector::new(today, cfg.window_days);

        let redraw = Rc::new(Cell::new(true));
        let store_flag = Rc::clone(&redraw);
        store.subscribe(Box::new(move |_| store_flag.set(true)));
        let view_flag = Rc::clone(&redraw);
        selector.subscribe(Box::new(move |_| view_flag.set(true)));

        let extractor: Arc<dyn Extractor> =
            Arc::new(RuleBasedExtractor::new().context("failed to build extractor")?);

        let splash_until = (!no_splash).then(|| Instant::now() + cfg.splash());

        Ok(Self {
            store,
            selector,
            intake: Intake::new(),
            dialog_open: false,
            journal_cursor: 0,
            task_cursor: 0,
            tick_count: 0,
            should_quit: false,
            redraw,
            splash_until,
            intake_delay: cfg.intake_delay(),
            extractor,
            outcome_tx,
            pending: None,
        })
    }

    #[must_use]
    pub fn splash_active(&self) -> bool {
        self.splash_until.is_some()
    }

    /// Thoughts on the journal's selected day, insertion order.
    #[must_use]
    pub fn visible_thoughts(&self) -> Vec<&Thought> {
        self.store
            .thoughts_for_day(self.selector.journal().selected_day())
    }

    /// Task ids as the Tasks view lists them: active first, then
    /// completed, both in store order.
    #[must_use]
    pub fn task_rows(&self) -> Vec<Uuid> {
        let (active, done) = self.store.partition_tasks();
        active
            .into_iter()
            .chain(done)
            .map(|task| task.id)
            .collect()
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.splash_active() {
            self.splash_until = None;
            return;
        }

        if self.dialog_open {
            self.on_dialog_key(key);
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.cycle_view(),
            KeyCode::Char('c') => self.selector.switch_to(View::Calendar),
            KeyCode::Char('j') => self.selector.switch_to(View::Journal),
            KeyCode::Char('t') => self.selector.switch_to(View::Tasks),
            KeyCode::Char('a') | KeyCode::Char('+') => self.open_dialog(),
            _ => match self.selector.current() {
                View::Journal => self.on_journal_key(key),
                View::Calendar => self.on_calendar_key(key),
                View::Tasks => self.on_tasks_key(key),
            },
        }
    }

    pub fn on_paste(&mut self, text: &str) {
        if self.dialog_open {
            self.intake.push_str(text);
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.tick_count = self.tick_count.wrapping_add(1);

        if let Some(deadline) = self.splash_until {
            if now >= deadline {
                self.splash_until = None;
            }
            self.redraw.set(true);
        }

        if self.intake.is_submitting() {
            self.redraw.set(true);
        }
    }

    /// Applies a worker completion, unless the dialog lifetime that
    /// requested it is gone.
    pub fn on_extraction_outcome(&mut self, outcome: ExtractionOutcome) {
        if !self.intake.finish(outcome.generation) {
            debug!(
                generation = outcome.generation,
                "discarding outcome for a dismissed dialog"
            );
            return;
        }

        let Some(pending) = self.pending.take() else {
            warn!("intake finished with no pending submission");
            return;
        };
        if pending.generation != outcome.generation {
            warn!(
                pending = pending.generation,
                outcome = outcome.generation,
                "pending submission does not match outcome"
            );
            return;
        }

        let now = Utc::now();
        match self.store.add_thought(&pending.content, now) {
            Ok(thought_id) => match outcome.result {
                Ok(candidates) => {
                    self.store.ingest_candidates(candidates, Some(thought_id), now);
                }
                Err(err) => {
                    warn!(error = %err, "extraction failed; keeping the thought without tasks");
                }
            },
            Err(err) => warn!(error = %err, "could not store submitted thought"),
        }

        self.dialog_open = false;
        self.redraw.set(true);
    }

    fn cycle_view(&mut self) {
        let next = match self.selector.current() {
            View::Calendar => View::Journal,
            View::Journal => View::Tasks,
            View::Tasks => View::Calendar,
        };
        self.selector.switch_to(next);
    }

    fn open_dialog(&mut self) {
        self.intake.open();
        self.dialog_open = true;
    }

    fn close_dialog(&mut self) {
        self.intake.dismiss();
        self.pending = None;
        self.dialog_open = false;
    }

    fn submit_dialog(&mut self) {
        let ticket = match self.intake.begin_submit() {
            Ok(ticket) => ticket,
            Err(err) => {
                debug!(error = %err, "submit rejected");
                return;
            }
        };

        if let Some(id) = ticket.editing {
            // Edits apply in place, without an extraction pass.
            if let Err(err) = self.store.update_thought(id, &ticket.content) {
                warn!(error = %err, "edit targeted a missing thought");
            }
            self.intake.finish(ticket.generation);
            self.dialog_open = false;
            return;
        }

        self.pending = Some(PendingSubmit {
            generation: ticket.generation,
            content: ticket.content.clone(),
        });
        spawn_extraction(
            Arc::clone(&self.extractor),
            ticket.content,
            ticket.generation,
            self.intake_delay,
            self.outcome_tx.clone(),
        );
    }

    fn on_dialog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_dialog(),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.intake.push_char('\n');
            }
            KeyCode::Enter => self.submit_dialog(),
            KeyCode::Backspace => self.intake.pop_char(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.intake.push_char(ch);
            }
            _ => {}
        }
    }

    fn on_journal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => {
                if self.selector.select_older_day() {
                    self.journal_cursor = 0;
                }
            }
            KeyCode::Right => {
                if self.selector.select_newer_day() {
                    self.journal_cursor = 0;
                }
            }
            KeyCode::Up => self.journal_cursor = self.journal_cursor.saturating_sub(1),
            KeyCode::Down => {
                let count = self.visible_thoughts().len();
                if self.journal_cursor + 1 < count {
                    self.journal_cursor += 1;
                }
            }
            KeyCode::Char('e') => self.edit_selected_thought(),
            KeyCode::Char('C') => self.clear_selected_day(),
            KeyCode::Char('s') => self.seed_selected_day(),
            _ => {}
        }
    }

    fn on_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.selector.previous_month(),
            KeyCode::Right => self.selector.next_month(),
            KeyCode::Home => self.selector.calendar_to_today(datetime::today()),
            _ => {}
        }
    }

    fn on_tasks_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.task_cursor = self.task_cursor.saturating_sub(1),
            KeyCode::Down => {
                let count = self.store.tasks().len();
                if self.task_cursor + 1 < count {
                    self.task_cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_task(),
            _ => {}
        }
    }

    fn edit_selected_thought(&mut self) {
        let target = self
            .visible_thoughts()
            .get(self.journal_cursor.min(self.visible_thoughts().len().saturating_sub(1)))
            .map(|thought| (thought.id, thought.content.clone()));

        if let Some((id, content)) = target {
            self.intake.open_edit(id, &content);
            self.dialog_open = true;
        }
    }

    fn clear_selected_day(&mut self) {
        let day = self.selector.journal().selected_day();
        self.store.clear_day(day);
        self.journal_cursor = 0;
    }

    /// Re-seeds the displayed day's thoughts, mirroring the empty-state
    /// sample-data affordance. Only acts on an empty day.
    fn seed_selected_day(&mut self) {
        if !self.visible_thoughts().is_empty() {
            return;
        }

        let day = self.selector.journal().selected_day();
        let anchor = if day == datetime::today() {
            Utc::now()
        } else {
            datetime::day_anchor(day)
        };

        match seed::sample_thoughts(anchor) {
            Ok(thoughts) => {
                for thought in thoughts {
                    self.store.insert_thought(thought);
                }
            }
            Err(err) => warn!(error = %err, "could not load sample thoughts"),
        }
    }

    fn toggle_selected_task(&mut self) {
        let rows = self.task_rows();
        let Some(&id) = rows.get(self.task_cursor.min(rows.len().saturating_sub(1))) else {
            return;
        };

        if let Err(err) = self.store.toggle_task(id) {
            // Ids come from the same collection, so this is a bug.
            warn!(error = %err, "toggle referenced a vanished task");
        }
    }
}
