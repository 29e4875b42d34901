//! A bot-specific façade over `forest::context::Context`.
//!
//! Grounded on `original_source/Telegram/include/forest/telegram/context.hpp`'s
//! `bot_context`, which layers `send_message`/`edit_message_text`/
//! `edit_message_markup`/`delete_message`/`answer_callback` plus `driver()`/
//! `chat_id()` observers over the engine's generic context type. The engine
//! itself (`forest::context::Context`) stays chat-agnostic; these
//! domain-specific operations are supplied here as an extension trait
//! instead of a distinct context type, so they compose with any `Storage`
//! that carries a driver handle and a chat id.

use forest::context::Context;

use crate::driver::{AnswerCallback, ChatId, Driver, EditMessage, Markup, MessageId, SendMessage};
use crate::error::DriverError;

/// Storage that carries a chat-bound driver handle. The minimum
/// [`BotContextExt`] needs to turn a bare `Context` into one that can act on
/// the chat it belongs to.
pub trait BotStorage {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;
    fn chat_id(&self) -> ChatId;
}

/// The storage shape `BotRunner::new`'s `make_storage` callback typically
/// produces: a shared driver handle plus the chat it is bound to.
#[derive(Debug, Clone)]
pub struct ChatStorage<D> {
    pub driver: std::sync::Arc<D>,
    pub chat_id: ChatId,
}

impl<D> ChatStorage<D> {
    pub fn new(driver: std::sync::Arc<D>, chat_id: ChatId) -> Self {
        Self { driver, chat_id }
    }
}

impl<D: Driver> BotStorage for ChatStorage<D> {
    type Driver = D;

    fn driver(&self) -> &D {
        &self.driver
    }

    fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

/// An outgoing message under construction, mirroring the original's nested
/// `bot_context::message` builder.
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub markup: Markup,
    pub parse_mode: Option<String>,
    pub disable_notification: bool,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    pub fn reply_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    pub fn markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }
}

/// Domain-specific context operations a bot reaction or hook can call
/// directly, without reaching into `storage()` and the driver by hand.
pub trait BotContextExt {
    type Driver: Driver;

    fn chat_id(&self) -> ChatId;
    fn driver(&self) -> &Self::Driver;
    fn send_message(&self, msg: OutgoingMessage) -> Result<Option<MessageId>, DriverError>;
    fn edit_message(&self, message_id: MessageId, msg: OutgoingMessage) -> Result<Option<MessageId>, DriverError>;
    fn delete_message(&self, message_id: MessageId) -> Result<(), DriverError>;
    fn answer_callback(&self, callback_id: String, text: impl Into<String>, show_alert: bool) -> Result<bool, DriverError>;
}

impl<Storage, S> BotContextExt for Context<'_, Storage, S>
where
    Storage: BotStorage + 'static,
{
    type Driver = Storage::Driver;

    fn chat_id(&self) -> ChatId {
        self.storage().chat_id()
    }

    fn driver(&self) -> &Self::Driver {
        self.storage().driver()
    }

    fn send_message(&self, msg: OutgoingMessage) -> Result<Option<MessageId>, DriverError> {
        self.driver().send_message(SendMessage {
            chat_id: self.chat_id(),
            text: msg.text,
            reply_to: msg.reply_to,
            markup: msg.markup,
            parse_mode: msg.parse_mode,
            disable_notification: msg.disable_notification,
        })
    }

    fn edit_message(&self, message_id: MessageId, msg: OutgoingMessage) -> Result<Option<MessageId>, DriverError> {
        self.driver().edit_message(EditMessage {
            chat_id: self.chat_id(),
            message_id,
            new_text: Some(msg.text),
            new_markup: Some(msg.markup),
            new_mode: msg.parse_mode,
        })
    }

    fn delete_message(&self, message_id: MessageId) -> Result<(), DriverError> {
        self.driver().delete_message(self.chat_id(), message_id)
    }

    fn answer_callback(&self, callback_id: String, text: impl Into<String>, show_alert: bool) -> Result<bool, DriverError> {
        self.driver().answer_callback(AnswerCallback { callback_id, text: text.into(), show_alert })
    }
}
