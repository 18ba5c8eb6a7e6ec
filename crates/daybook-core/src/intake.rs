use tracing::debug;
use uuid::Uuid;

use crate::error::IntakeError;

/// Lifecycle of the thought capture surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakeState {
    #[default]
    Idle,
    /// A submission is in flight; the submit affordance is disabled.
    Submitting,
}

/// Content and generation handed to the extraction pipeline when a
/// submission begins.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub generation: u64,
    pub content: String,
    /// Set when the submission replaces an existing thought (Edit).
    pub editing: Option<Uuid>,
}

/// Free-text capture state machine: `Idle → Submitting → Idle`.
///
/// Every dialog lifetime carries a generation number. Dismissal bumps
/// it, so a completion that arrives afterwards no longer matches and
/// is discarded without touching any state.
#[derive(Debug, Default)]
pub struct Intake {
    buffer: String,
    state: IntakeState,
    generation: u64,
    editing: Option<Uuid>,
}

impl Intake {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> IntakeState {
        self.state
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state == IntakeState::Submitting
    }

    /// Whether the submit affordance should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state == IntakeState::Idle && !self.buffer.trim().is_empty()
    }

    /// Opens a fresh capture. Any previously pending completion is
    /// orphaned by the generation bump.
    pub fn open(&mut self) {
        self.abandon("opened fresh intake");
    }

    /// Opens the capture pre-filled with an existing thought's content;
    /// submitting will update that thought instead of creating one.
    pub fn open_edit(&mut self, id: Uuid, content: &str) {
        self.abandon("opened edit intake");
        self.buffer = content.to_string();
        self.editing = Some(id);
    }

    /// Dismisses the surface. A completion still in flight for the old
    /// generation will be dropped on arrival.
    pub fn dismiss(&mut self) {
        self.abandon("dismissed intake");
    }

    pub fn push_char(&mut self, ch: char) {
        if self.state == IntakeState::Idle {
            self.buffer.push(ch);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if self.state == IntakeState::Idle {
            self.buffer.push_str(text);
        }
    }

    pub fn pop_char(&mut self) {
        if self.state == IntakeState::Idle {
            self.buffer.pop();
        }
    }

    /// Enters `Submitting` and hands back the ticket for the worker.
    /// Only valid from `Idle` with non-empty content.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, IntakeError> {
        if self.state == IntakeState::Submitting {
            return Err(IntakeError::Busy);
        }

        let content = self.buffer.trim().to_string();
        if content.is_empty() {
            return Err(IntakeError::EmptyContent);
        }

        self.state = IntakeState::Submitting;
        debug!(generation = self.generation, "intake submitting");
        Ok(SubmitTicket {
            generation: self.generation,
            content,
            editing: self.editing,
        })
    }

    /// Applies a completion. Returns true and resets to `Idle` when the
    /// generation is current; a stale generation leaves every field
    /// untouched.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state != IntakeState::Submitting {
            debug!(
                generation,
                current = self.generation,
                "dropping stale intake completion"
            );
            return false;
        }

        self.state = IntakeState::Idle;
        self.buffer.clear();
        self.editing = None;
        true
    }

    fn abandon(&mut self, why: &'static str) {
        if self.state == IntakeState::Submitting {
            debug!(generation = self.generation, why, "orphaning pending submission");
        }
        self.generation += 1;
        self.state = IntakeState::Idle;
        self.buffer.clear();
        self.editing = None;
    }
}
