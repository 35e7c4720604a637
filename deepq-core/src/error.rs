//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum DeepqError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// More transitions were requested than the replay buffer holds.
    #[error("Requested {requested} transitions, but the replay buffer holds only {available}")]
    InsufficientTransitions {
        /// The requested batch size.
        requested: usize,
        /// The number of stored transitions.
        available: usize,
    },

    /// The action at the given index does not have the expected meaning.
    #[error("Action {index} is expected to be {expected}, found {found:?}")]
    MissingActionMeaning {
        /// Index in the action set.
        index: usize,
        /// Expected meaning, like `"NOOP"`.
        expected: String,
        /// Actual meaning, `None` if the action set is shorter.
        found: Option<String>,
    },

    /// The action set is smaller than a wrapper requires.
    #[error("At least {required} actions are required, found {found}")]
    TooFewActions {
        /// The minimum number of actions.
        required: usize,
        /// The number of actions of the environment.
        found: usize,
    },

    /// An observation did not have the expected shape.
    #[error("Unexpected observation shape: expected {expected:?}, found {found:?}")]
    ObservationShape {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        found: Vec<usize>,
    },
}
