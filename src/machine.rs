//! Owns the per-state records, the active-state bitset, and user storage;
//! drives `start`/`stop`/`react` and the LCA-based transition algorithm.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::builder::MachineDef;
use crate::context::Context;
use crate::error::UnsupportedEvent;
use crate::history::HistoryKind;
use crate::reaction::Reactant;
use crate::state::StateRecord;
use crate::transit::Outcome;

/// A record slot that is briefly [`Slot::Empty`] while its owning state is
/// under mutation, so that the context handed to its hook/reaction can
/// still borrow the rest of the machine (including, transiently, this slot
/// standing empty) without violating aliasing rules.
enum Slot<Storage> {
    Present(Box<dyn StateRecord<Storage>>),
    Empty,
}

enum Hook {
    Enter,
    Exit,
    Reenter,
}

/// A running instance of a machine built from a [`MachineDef`].
pub struct MachineInstance<Storage> {
    def: Arc<MachineDef<Storage>>,
    records: Vec<Slot<Storage>>,
    active: Vec<bool>,
    started: bool,
    storage: Storage,
    history_state: HashMap<usize, Vec<usize>>,
}

impl<Storage: 'static> MachineInstance<Storage> {
    pub fn new(def: Arc<MachineDef<Storage>>, storage: Storage) -> Self {
        let records = def.new_records().into_iter().map(Slot::Present).collect();
        let active = vec![false; def.tree().len()];
        Self { def, records, active, started: false, storage, history_state: HashMap::new() }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.active[idx]
    }

    pub fn is_active_type<T: 'static>(&self) -> bool {
        self.def
            .index_of_type(TypeId::of::<T>())
            .map(|idx| self.active[idx])
            .unwrap_or(false)
    }

    fn is_leaf_active(&self, idx: usize) -> bool {
        self.active[idx] && self.def.tree().children(idx).iter().all(|&c| !self.active[c])
    }

    pub fn state_cast<T: 'static>(&self) -> &T {
        let idx = self
            .def
            .index_of_type(TypeId::of::<T>())
            .expect("state_cast: type was never bound");
        match &self.records[idx] {
            Slot::Present(record) => record.as_any().downcast_ref().expect("binder/type mismatch"),
            Slot::Empty => panic!("state_cast: state is currently mid-hook and cannot be borrowed"),
        }
    }

    pub fn state_cast_mut<T: 'static>(&mut self) -> &mut T {
        let idx = self
            .def
            .index_of_type(TypeId::of::<T>())
            .expect("state_cast_mut: type was never bound");
        match &mut self.records[idx] {
            Slot::Present(record) => record.as_any_mut().downcast_mut().expect("binder/type mismatch"),
            Slot::Empty => panic!("state_cast_mut: state is currently mid-hook and cannot be borrowed"),
        }
    }

    pub fn get_context<S: 'static>(&mut self) -> Context<'_, Storage, S> {
        Context::new(self)
    }

    /// Activates the root and fans out into every region encountered while
    /// descending, invoking `enter` top-down.
    pub fn start(&mut self) {
        let root = self.def.tree().root();
        debug_assert!(!self.active[root], "start: root already active");
        tracing::debug!(root = self.def.tree().name(root), "starting machine");
        self.enter_one(root);
        self.enter_region_fanout(root);
        self.restore_history(root);
        self.started = true;
        self.check_invariants();
    }

    /// Exits every active descendant of the root bottom-up, then the root.
    pub fn stop(&mut self) {
        let root = self.def.tree().root();
        debug_assert!(self.active[root], "stop: root not active");
        tracing::debug!(root = self.def.tree().name(root), "stopping machine");
        let subtree = self.def.tree().subtree_exclusive(root);
        for &idx in subtree.iter().chain(std::iter::once(&root)) {
            self.maybe_save_history(idx);
        }
        for idx in subtree {
            if self.active[idx] {
                self.exit_one(idx);
            }
        }
        self.exit_one(root);
        self.started = false;
    }

    /// Dispatches `event` to at most one reaction. Returns `Ok(true)` if a
    /// reaction fired (even if it yielded no transition), `Ok(false)` if
    /// every candidate reactant's leaf was inactive or its guard declined,
    /// and `Err(UnsupportedEvent)` if no reaction was ever registered for
    /// `E` on this machine.
    pub fn react<E: 'static>(&mut self, event: E) -> Result<bool, UnsupportedEvent> {
        let def = Arc::clone(&self.def);
        let Some(reactants) = def.reactions.reactants_for::<E>() else {
            tracing::debug!(event = std::any::type_name::<E>(), "no reaction registered for event type");
            return Err(UnsupportedEvent);
        };

        let event: &dyn Any = &event;
        for reactant in reactants {
            if !self.is_leaf_active(reactant.leaf_idx) {
                continue;
            }
            if !self.invoke_guard(reactant, event) {
                continue;
            }
            tracing::trace!(
                leaf = def.tree().name(reactant.leaf_idx),
                declaring_state = def.tree().name(reactant.super_idx),
                event = std::any::type_name::<E>(),
                "dispatching reaction"
            );
            let outcome = self.invoke_handler(reactant, event);
            if let Outcome::To(target_type) = outcome {
                let target_idx = def
                    .index_of_type(target_type)
                    .expect("Transit<T> target was never bound to this machine");
                self.transition_to(reactant.leaf_idx, target_idx);
            }
            self.check_invariants();
            return Ok(true);
        }
        Ok(false)
    }

    fn invoke_guard(&mut self, reactant: &Reactant<Storage>, event: &dyn Any) -> bool {
        let Some(guard) = &reactant.guard else { return true };
        let slot = std::mem::replace(&mut self.records[reactant.super_idx], Slot::Empty);
        let Slot::Present(mut record) = slot else {
            self.records[reactant.super_idx] = Slot::Empty;
            return true;
        };
        let result = {
            let mut ctx = Context::<Storage>::new(self);
            guard(record.as_any_mut(), &mut ctx, event)
        };
        self.records[reactant.super_idx] = Slot::Present(record);
        result
    }

    fn invoke_handler(&mut self, reactant: &Reactant<Storage>, event: &dyn Any) -> Outcome {
        let slot = std::mem::replace(&mut self.records[reactant.super_idx], Slot::Empty);
        let Slot::Present(mut record) = slot else {
            self.records[reactant.super_idx] = Slot::Empty;
            return Outcome::None;
        };
        let outcome = {
            let mut ctx = Context::<Storage>::new(self);
            (reactant.handler)(record.as_any_mut(), &mut ctx, event)
        };
        self.records[reactant.super_idx] = Slot::Present(record);
        outcome
    }

    /// Runs the LCA-based entry/exit protocol for a transition from active
    /// leaf `leaf` to target `target`.
    fn transition_to(&mut self, leaf: usize, target: usize) {
        if leaf == target {
            tracing::trace!(state = self.def.tree().name(leaf), "reentering state");
            self.invoke_hook(leaf, Hook::Reenter);
            return;
        }

        let tree = self.def.tree();
        let lca = tree.lca(leaf, target);
        debug_assert!(!tree.is_region(lca), "transition lca must not be a region");
        tracing::debug!(from = tree.name(leaf), to = tree.name(target), lca = tree.name(lca), "transitioning");

        if lca != leaf {
            let before = tree.before_lca(leaf, target);
            let exit_subtree = tree.subtree_exclusive(before);
            for &idx in exit_subtree.iter().chain(std::iter::once(&before)) {
                self.maybe_save_history(idx);
            }
            for idx in exit_subtree {
                if self.active[idx] {
                    self.exit_one(idx);
                }
            }
            self.exit_one(before);
        }

        let path = self.def.tree().path(lca, target);
        for &idx in path.iter().skip(1) {
            if !self.active[idx] {
                self.enter_one(idx);
            }
        }
        self.enter_region_fanout(target);
        self.restore_history(target);
    }

    fn maybe_save_history(&mut self, idx: usize) {
        let Some(kind) = self.def.history_kind.get(&idx).copied() else { return };
        let tree = self.def.tree();
        let saved: Vec<usize> = match kind {
            HistoryKind::Shallow => tree.children(idx).iter().copied().filter(|&c| self.active[c]).collect(),
            HistoryKind::Deep => tree
                .subtree_exclusive(idx)
                .into_iter()
                .filter(|&n| self.active[n])
                .collect(),
        };
        self.history_state.insert(idx, saved);
    }

    fn restore_history(&mut self, idx: usize) {
        let Some(kind) = self.def.history_kind.get(&idx).copied() else { return };
        let Some(saved) = self.history_state.get(&idx).cloned() else { return };
        match kind {
            HistoryKind::Shallow => {
                for child in saved {
                    if !self.active[child] {
                        self.enter_one(child);
                    }
                    self.enter_region_fanout(child);
                }
            }
            HistoryKind::Deep => {
                let mut nodes = saved;
                nodes.sort_by_key(|&n| self.def.tree().depth(n));
                for n in nodes {
                    if !self.active[n] {
                        self.enter_one(n);
                    }
                }
            }
        }
    }

    fn enter_region_fanout(&mut self, idx: usize) {
        if !self.def.tree().is_region(idx) {
            return;
        }
        let children: Vec<usize> = self.def.tree().children(idx).to_vec();
        for child in children {
            if !self.active[child] {
                self.enter_one(child);
            }
            self.enter_region_fanout(child);
        }
    }

    fn enter_one(&mut self, idx: usize) {
        self.active[idx] = true;
        self.invoke_hook(idx, Hook::Enter);
    }

    fn exit_one(&mut self, idx: usize) {
        self.invoke_hook(idx, Hook::Exit);
        self.active[idx] = false;
    }

    fn invoke_hook(&mut self, idx: usize, hook: Hook) {
        let slot = std::mem::replace(&mut self.records[idx], Slot::Empty);
        let Slot::Present(mut record) = slot else {
            self.records[idx] = Slot::Empty;
            return;
        };
        {
            let mut ctx = Context::<Storage>::new(self);
            match hook {
                Hook::Enter => record.enter(&mut ctx),
                Hook::Exit => record.exit(&mut ctx),
                Hook::Reenter => record.reenter(&mut ctx),
            }
        }
        self.records[idx] = Slot::Present(record);
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        if !self.started {
            return;
        }
        let tree = self.def.tree();
        for i in 0..tree.len() {
            if !self.active[i] {
                continue;
            }
            if let Some(p) = tree.parent(i) {
                assert!(self.active[p], "active state {i} has inactive parent {p}");
            }
            if tree.is_region(i) {
                assert!(
                    tree.children(i).iter().all(|&c| self.active[c]),
                    "active region {i} has an inactive child"
                );
            } else {
                let active_children = tree.children(i).iter().filter(|&&c| self.active[c]).count();
                assert!(active_children <= 1, "active non-region state {i} has {active_children} active children");
            }
        }
    }

    #[cfg(not(debug_assertions))]
    fn check_invariants(&self) {}
}
