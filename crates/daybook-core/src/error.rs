use uuid::Uuid;

/// Domain errors from the in-memory entry store.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Input was empty or whitespace-only.
    #[error("content is empty")]
    EmptyContent,

    /// An operation referenced a task id absent from the collection.
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    /// An operation referenced a thought id absent from the collection.
    #[error("thought not found: {0}")]
    ThoughtNotFound(Uuid),
}

/// Errors from the thought intake state machine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("nothing to submit")]
    EmptyContent,

    /// A submission is already in flight; the surface should have
    /// disabled the affordance.
    #[error("a submission is already in progress")]
    Busy,
}

/// Errors from the extraction collaborator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no content to extract from")]
    NoContent,
}
