//! Binds parsed tree names to concrete state-record types and produces an
//! immutable [`MachineDef`] that [`crate::machine::MachineInstance`] runs
//! against.

use std::any::TypeId;
use std::collections::HashMap;

use crate::context::Context;
use crate::error::{BindError, ParseError};
use crate::history::HistoryKind;
use crate::reaction::ReactionTable;
use crate::state::StateRecord;
use crate::transit::IntoOutcome;
use crate::tree::{syntax, Tree};

type Ctor<Storage> = Box<dyn Fn() -> Box<dyn StateRecord<Storage>>>;

struct BoundSlot<Storage> {
    ctor: Ctor<Storage>,
}

type PendingRegistration<Storage> =
    Box<dyn FnOnce(&mut ReactionTable<Storage>, &HashMap<TypeId, usize>, &Tree)>;

/// Incrementally binds tree names to state types and registers reactions,
/// then [`MachineBuilder::build`]s the immutable machine definition.
pub struct MachineBuilder<Storage> {
    tree: Tree,
    bound: Vec<Option<BoundSlot<Storage>>>,
    type_to_index: HashMap<TypeId, usize>,
    pending: Vec<PendingRegistration<Storage>>,
    history_kind: HashMap<usize, HistoryKind>,
}

impl<Storage: 'static> MachineBuilder<Storage> {
    pub fn new(text: &str) -> Result<Self, ParseError> {
        let syntax = syntax::parse(text)?;
        let tree = Tree::from_syntax(&syntax);
        let n = tree.len();
        Ok(Self {
            tree,
            bound: (0..n).map(|_| None).collect(),
            type_to_index: HashMap::new(),
            pending: Vec::new(),
            history_kind: HashMap::new(),
        })
    }

    /// Marks `name`'s state as historical: re-entering it restores the
    /// substate hierarchy that was active when it was last exited, rather
    /// than whatever the target's path computation would otherwise enter.
    pub fn enable_history(&mut self, name: &str, kind: HistoryKind) -> Result<&mut Self, BindError> {
        let idx = self
            .tree
            .index_of(name)
            .ok_or_else(|| BindError::Unknown(name.to_string()))?;
        self.history_kind.insert(idx, kind);
        Ok(self)
    }

    /// Associates the tree node named `name` with the record type `T`,
    /// default-constructed once per [`crate::machine::MachineInstance`].
    pub fn bind<T>(&mut self, name: &str) -> Result<&mut Self, BindError>
    where
        T: StateRecord<Storage> + Default + 'static,
    {
        let idx = self
            .tree
            .index_of(name)
            .ok_or_else(|| BindError::Unknown(name.to_string()))?;

        if self.bound[idx].is_some() {
            return Err(BindError::Arity(name.to_string()));
        }

        self.bound[idx] = Some(BoundSlot { ctor: Box::new(|| Box::new(T::default())) });
        self.type_to_index.insert(TypeId::of::<T>(), idx);
        Ok(self)
    }

    /// Registers `handler` as `Super`'s reaction to events of type `E`,
    /// reachable from any state in `Super`'s subtree once it is the active
    /// leaf.
    pub fn on_reaction<Super, E, R, F>(&mut self, handler: F)
    where
        Super: 'static,
        E: 'static,
        R: IntoOutcome + 'static,
        F: Fn(&mut Super, &mut Context<'_, Storage>, &E) -> R + Clone + 'static,
    {
        self.on_guarded_reaction::<Super, E, R, F, fn(&Super, &Context<'_, Storage>, &E) -> bool>(None, handler);
    }

    /// As [`MachineBuilder::on_reaction`], but the reaction only fires when
    /// `guard` returns `true`.
    pub fn on_guarded_reaction<Super, E, R, F, G>(&mut self, guard: Option<G>, handler: F)
    where
        Super: 'static,
        E: 'static,
        R: IntoOutcome + 'static,
        F: Fn(&mut Super, &mut Context<'_, Storage>, &E) -> R + Clone + 'static,
        G: Fn(&Super, &Context<'_, Storage>, &E) -> bool + Clone + 'static,
    {
        self.pending.push(Box::new(move |table, type_to_index, tree| {
            let super_idx = *type_to_index
                .get(&TypeId::of::<Super>())
                .expect("on_reaction registered against an unbound state type");
            for leaf_idx in tree.subtree_inclusive(super_idx) {
                table.register::<E, Super, R, _, _>(super_idx, leaf_idx, handler.clone(), guard.clone());
            }
        }));
    }

    /// Validates every tree node was bound exactly once, finalizes the
    /// reaction ordering, and produces the immutable machine definition.
    pub fn build(mut self) -> Result<MachineDef<Storage>, BindError> {
        for (i, slot) in self.bound.iter().enumerate() {
            if slot.is_none() {
                return Err(BindError::Unbound(self.tree.name(i).to_string()));
            }
        }

        let mut table = ReactionTable::new();
        for pending in std::mem::take(&mut self.pending) {
            pending(&mut table, &self.type_to_index, &self.tree);
        }
        table.finalize(|idx| self.tree.depth(idx));

        let ctors = self
            .bound
            .into_iter()
            .map(|slot| slot.expect("validated above").ctor)
            .collect();

        Ok(MachineDef {
            tree: self.tree,
            type_to_index: self.type_to_index,
            ctors,
            reactions: table,
            history_kind: self.history_kind,
        })
    }
}

/// The immutable, shareable result of binding: tree shape, index↔type
/// mapping, default constructors, and the precomputed reaction table.
pub struct MachineDef<Storage> {
    pub(crate) tree: Tree,
    pub(crate) type_to_index: HashMap<TypeId, usize>,
    pub(crate) ctors: Vec<Ctor<Storage>>,
    pub(crate) reactions: ReactionTable<Storage>,
    pub(crate) history_kind: HashMap<usize, HistoryKind>,
}

impl<Storage> MachineDef<Storage> {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn new_records(&self) -> Vec<Box<dyn StateRecord<Storage>>> {
        self.ctors.iter().map(|ctor| ctor()).collect()
    }

    pub(crate) fn index_of_type(&self, type_id: TypeId) -> Option<usize> {
        self.type_to_index.get(&type_id).copied()
    }
}
