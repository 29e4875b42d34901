pub use crate::{
    builder::{MachineBuilder, MachineDef},
    context::Context,
    error::{BindError, InvariantViolation, ParseError, UnsupportedEvent},
    guards::GuardSet,
    history::HistoryKind,
    machine::MachineInstance,
    state::StateRecord,
    transit::{IntoOutcome, Outcome, Transit, TransitNone, TransitResult1, TransitResult2, TransitResult3, TransitResult4},
    tree::{NodeKind, SyntaxTree, Tree},
};
