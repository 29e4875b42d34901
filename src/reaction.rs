//! Per-event-type reaction tables, precomputed once at build time.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::context::Context;
use crate::transit::{IntoOutcome, Outcome};

/// A single registered reaction: `super_idx` declares it, reachable from any
/// active `leaf_idx` in its ancestor chain.
pub(crate) struct Reactant<Storage> {
    pub leaf_idx: usize,
    pub super_idx: usize,
    pub guard: Option<Box<dyn Fn(&mut dyn Any, &mut Context<'_, Storage>, &dyn Any) -> bool>>,
    pub handler: Box<dyn Fn(&mut dyn Any, &mut Context<'_, Storage>, &dyn Any) -> Outcome>,
}

/// `Reactants(E)`: the ordered set of `(leaf, super)` pairs for one event
/// type, deepest leaf first, most-derived super first within a leaf.
#[derive(Default)]
pub(crate) struct ReactionTable<Storage> {
    by_event: HashMap<TypeId, Vec<Reactant<Storage>>>,
}

impl<Storage> ReactionTable<Storage> {
    pub fn new() -> Self {
        Self { by_event: HashMap::new() }
    }

    pub fn register<E, Super, R, F, G>(&mut self, super_idx: usize, leaf_idx: usize, handler: F, guard: Option<G>)
    where
        E: 'static,
        Super: 'static,
        R: IntoOutcome,
        F: Fn(&mut Super, &mut Context<'_, Storage>, &E) -> R + 'static,
        G: Fn(&Super, &Context<'_, Storage>, &E) -> bool + 'static,
    {
        let handler = Box::new(move |state: &mut dyn Any, ctx: &mut Context<'_, Storage>, event: &dyn Any| -> Outcome {
            let state = state.downcast_mut::<Super>().expect("reaction registered against mismatched state type");
            let event = event.downcast_ref::<E>().expect("reaction dispatched with mismatched event type");
            handler(state, ctx, event).into_outcome()
        });

        let guard = guard.map(|g| -> Box<dyn Fn(&mut dyn Any, &mut Context<'_, Storage>, &dyn Any) -> bool> {
            Box::new(move |state: &mut dyn Any, ctx: &mut Context<'_, Storage>, event: &dyn Any| -> bool {
                let state = state.downcast_ref::<Super>().expect("guard registered against mismatched state type");
                let event = event.downcast_ref::<E>().expect("guard dispatched with mismatched event type");
                g(state, ctx, event)
            })
        });

        self.by_event
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Reactant { leaf_idx, super_idx, guard, handler });
    }

    /// Sorts every event's reactant list by the dispatch ordering rule:
    /// deepest leaf first (ties broken by ascending leaf index for
    /// determinism), then most-derived super first within a leaf.
    pub fn finalize(&mut self, depth_of: impl Fn(usize) -> usize) {
        for reactants in self.by_event.values_mut() {
            reactants.sort_by(|a, b| {
                depth_of(b.leaf_idx)
                    .cmp(&depth_of(a.leaf_idx))
                    .then(a.leaf_idx.cmp(&b.leaf_idx))
                    .then(depth_of(b.super_idx).cmp(&depth_of(a.super_idx)))
            });
        }
    }

    pub fn reactants_for<E: 'static>(&self) -> Option<&[Reactant<Storage>]> {
        self.by_event.get(&TypeId::of::<E>()).map(|v| v.as_slice())
    }
}
