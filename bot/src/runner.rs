//! Routes chat updates to the machine instance for their chat, creating and
//! `start()`ing one on first contact. The step from a [`Projected`] event
//! to a concrete `react::<E>()` call is supplied by the caller, since only
//! the caller's crate knows the full set of `Command`/`Button` types a
//! particular machine was built against.

use std::collections::HashMap;
use std::sync::Arc;

use forest::builder::MachineDef;
use forest::machine::MachineInstance;

use crate::driver::{ChatId, CommandDescriptor, Driver, Update};
use crate::error::DriverError;
use crate::projection::{project, Projected};

pub struct BotRunner<Storage, D, F> {
    def: Arc<MachineDef<Storage>>,
    driver: Arc<D>,
    commands: Vec<CommandDescriptor>,
    make_storage: Box<dyn Fn(ChatId, Arc<D>) -> Storage>,
    dispatch: F,
    instances: HashMap<ChatId, MachineInstance<Storage>>,
}

impl<Storage, D, F> BotRunner<Storage, D, F>
where
    Storage: 'static,
    D: Driver,
    F: Fn(&mut MachineInstance<Storage>, Projected),
{
    pub fn new(
        def: Arc<MachineDef<Storage>>,
        driver: Arc<D>,
        commands: Vec<CommandDescriptor>,
        make_storage: impl Fn(ChatId, Arc<D>) -> Storage + 'static,
        dispatch: F,
    ) -> Self {
        Self { def, driver, commands, make_storage: Box::new(make_storage), dispatch, instances: HashMap::new() }
    }

    pub fn publish_commands(&self) -> Result<bool, DriverError> {
        self.driver.set_commands(&self.commands)
    }

    /// The machine instance for `chat_id`, if one has been provisioned yet.
    pub fn instance(&self, chat_id: ChatId) -> Option<&MachineInstance<Storage>> {
        self.instances.get(&chat_id)
    }

    /// Runs the projection pipeline over `update` and, if it yields a
    /// typed event the caller's `dispatch` recognizes, feeds it to the
    /// chat's machine instance. Auto-provisions a fresh, started instance
    /// on first contact for the chat.
    pub fn handle_update(&mut self, update: Update) {
        let Some(chat_id) = chat_id_of(&update) else { return };
        let driver = Arc::clone(&self.driver);
        let instance = self.instances.entry(chat_id).or_insert_with(|| {
            let storage = (self.make_storage)(chat_id, driver);
            let mut instance = MachineInstance::new(Arc::clone(&self.def), storage);
            instance.start();
            instance
        });
        if let Some(projected) = project(&update, &self.commands) {
            (self.dispatch)(instance, projected);
        }
    }

    pub fn run_once(&mut self) -> Result<usize, DriverError> {
        let polled = self.driver.poll()?;
        for _ in 0..polled {
            if let Some(update) = self.driver.next_update()? {
                self.handle_update(update);
            }
        }
        Ok(polled)
    }
}

fn chat_id_of(update: &Update) -> Option<ChatId> {
    match update {
        Update::NewMessage(m) | Update::EditedMessage(m) => Some(m.chat_id),
        Update::Callback(c) => c.message.as_ref().map(|m| m.chat_id),
    }
}
