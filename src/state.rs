//! The contract a user-supplied state record satisfies.

use std::any::Any;

use crate::context::Context;

/// Lifecycle hooks a state record may implement. All methods are no-ops by
/// default; a state only overrides the ones it needs. Typed reactions and
/// guards are not members of this trait (an object-safe trait cannot host a
/// method generic over an event type) — they are registered separately
/// against a [`crate::builder::MachineBuilder`] via `on_reaction`/`on_guard`.
pub trait StateRecord<Storage>: Any {
    /// Invoked when the state becomes active by a non-reenter path.
    fn enter(&mut self, _ctx: &mut Context<'_, Storage>) {}

    /// Invoked when the state leaves the active set.
    fn exit(&mut self, _ctx: &mut Context<'_, Storage>) {}

    /// Invoked on a self-transition (`F == T`) in place of exit/enter.
    fn reenter(&mut self, _ctx: &mut Context<'_, Storage>) {}

}

impl<Storage: 'static> dyn StateRecord<Storage> {
    pub(crate) fn as_any(&self) -> &dyn Any {
        self
    }

    pub(crate) fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
