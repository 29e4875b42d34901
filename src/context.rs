//! The per-state façade passed to hooks and reactions.

use std::marker::PhantomData;

use crate::machine::MachineInstance;

/// A thin, non-owning view into a running [`MachineInstance`], statically
/// tagged by the state it was obtained from. Hooks (`enter`/`exit`/`reenter`)
/// receive the untagged `Context<'_, Storage, ()>`; reactions registered
/// through `MachineBuilder::on_reaction` receive one tagged by the
/// declaring state, and may [`Context::upcast`] it to any ancestor's tag.
pub struct Context<'a, Storage, S = ()> {
    machine: &'a mut MachineInstance<Storage>,
    _marker: PhantomData<S>,
}

impl<'a, Storage: 'static, S> Context<'a, Storage, S> {
    pub(crate) fn new(machine: &'a mut MachineInstance<Storage>) -> Self {
        Self { machine, _marker: PhantomData }
    }

    /// Reinterprets this context as belonging to `A`. Callers are
    /// responsible for only upcasting to an actual ancestor of `S`; the
    /// machine has no compile-time knowledge of the hierarchy shape to
    /// check this for them.
    pub fn upcast<A>(self) -> Context<'a, Storage, A> {
        Context { machine: self.machine, _marker: PhantomData }
    }

    pub fn is_active<T: 'static>(&self) -> bool {
        self.machine.is_active_type::<T>()
    }

    pub fn state_cast<T: 'static>(&self) -> &T {
        self.machine.state_cast::<T>()
    }

    pub fn state_cast_mut<T: 'static>(&mut self) -> &mut T {
        self.machine.state_cast_mut::<T>()
    }

    pub fn storage(&self) -> &Storage {
        self.machine.storage()
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        self.machine.storage_mut()
    }
}
