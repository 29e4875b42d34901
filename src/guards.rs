//! A named guard set, layered on top of the per-reaction boolean guard of
//! `MachineBuilder::on_guarded_reaction`. A reaction's own guard closure can
//! consult a `GuardSet` kept in user storage to block a transition until
//! named preconditions clear, without threading extra state through every
//! individual guard closure.

use std::collections::HashSet;

/// A set of named conditions that must all clear before a transition guarded
/// by it is allowed to fire.
#[derive(Debug, Default, Clone)]
pub struct GuardSet {
    blocking: HashSet<String>,
}

impl GuardSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&mut self, name: impl Into<String>) {
        self.blocking.insert(name.into());
    }

    pub fn clear(&mut self, name: &str) {
        self.blocking.remove(name);
    }

    pub fn is_blocked_by(&self, name: &str) -> bool {
        self.blocking.contains(name)
    }

    /// `true` once every named condition has cleared.
    pub fn check(&self) -> bool {
        self.blocking.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_until_every_condition_clears() {
        let mut guards = GuardSet::new();
        assert!(guards.check());
        guards.block("door_locked");
        guards.block("alarm_armed");
        assert!(!guards.check());
        guards.clear("door_locked");
        assert!(!guards.check());
        guards.clear("alarm_armed");
        assert!(guards.check());
    }
}
