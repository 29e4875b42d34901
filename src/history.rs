//! Shallow/deep history: restoring a previously-active substate hierarchy
//! instead of starting over when a historical state is re-entered.

/// Whether a historical state remembers only its direct active child
/// ([`HistoryKind::Shallow`]) or the entire nested hierarchy that was active
/// beneath it ([`HistoryKind::Deep`]) when it was last exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Shallow,
    Deep,
}
