//! Error taxonomy for the tree parser, hierarchy binder, and machine runtime.

use thiserror::Error;

/// Failure while parsing an indented ASCII-art tree into a [`crate::tree::syntax::SyntaxTree`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("input contained no state lines")]
    Empty,
    #[error("line {line}: empty identifier")]
    EmptyIdentifier { line: usize },
    #[error("line {line}: duplicate state name '{name}'")]
    DuplicateName { line: usize, name: String },
    #[error("line {line}: malformed region marker")]
    BadRegionMarker { line: usize },
}

/// Failure while binding parsed names to concrete [`crate::state::StateRecord`] types.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("state '{0}' was never bound to a record type")]
    Unbound(String),
    #[error("bound name '{0}' does not appear in the parsed tree")]
    Unknown(String),
    #[error("state '{0}' was bound more than once")]
    Arity(String),
}

/// Returned by `MachineInstance::react` when no reaction was registered for
/// the event type from any currently active state.
#[derive(Debug, Error)]
#[error("no reaction registered for this event type from the current active configuration")]
pub struct UnsupportedEvent;

/// Raised (debug builds only) when a post-condition of the transition
/// algorithm is violated, indicating a bug in the engine itself.
#[derive(Debug, Error)]
#[error("state machine invariant violated: {0}")]
pub struct InvariantViolation(pub String);
