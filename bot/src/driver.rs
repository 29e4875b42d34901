//! The chat-API driver contract: the seven operations a provider-specific
//! transport must support, plus the wire types they exchange. No concrete
//! implementation ships here — the HTTP transport and provider wire format
//! are external collaborators.

use serde::{Deserialize, Serialize};

use crate::error::DriverError;

pub type ChatId = i64;
pub type MessageId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub url: Option<String>,
    pub callback_data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Markup {
    None,
    ForceReply { selective: bool },
    InlineKeyboard(Vec<Vec<InlineButton>>),
}

impl Default for Markup {
    fn default() -> Self {
        Markup::None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub timestamp: i64,
    pub from: Option<User>,
    pub reply_to: Option<MessageId>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callback {
    pub id: String,
    pub user: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Update {
    NewMessage(Message),
    EditedMessage(Message),
    Callback(Callback),
}

#[derive(Debug, Clone, Default)]
pub struct SendMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub markup: Markup,
    pub parse_mode: Option<String>,
    pub disable_notification: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EditMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub new_text: Option<String>,
    pub new_markup: Option<Markup>,
    pub new_mode: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AnswerCallback {
    pub callback_id: String,
    pub text: String,
    pub show_alert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub prefix: &'static str,
    pub description: &'static str,
}

impl CommandDescriptor {
    pub fn of<Cmd: crate::projection::Command>() -> Self {
        Self { prefix: Cmd::NAME, description: Cmd::DESCRIPTION }
    }
}

/// Synchronous driver contract: the seven operations a provider-specific
/// transport must support.
pub trait Driver {
    fn send_message(&self, input: SendMessage) -> Result<Option<MessageId>, DriverError>;
    fn edit_message(&self, input: EditMessage) -> Result<Option<MessageId>, DriverError>;
    fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), DriverError>;
    fn answer_callback(&self, input: AnswerCallback) -> Result<bool, DriverError>;
    fn set_commands(&self, commands: &[CommandDescriptor]) -> Result<bool, DriverError>;
    fn next_update(&self) -> Result<Option<Update>, DriverError>;
    fn poll(&self) -> Result<usize, DriverError>;
}

/// As [`Driver`], for providers whose transport is naturally async.
#[async_trait::async_trait]
pub trait AsyncDriver {
    async fn send_message(&self, input: SendMessage) -> Result<Option<MessageId>, DriverError>;
    async fn edit_message(&self, input: EditMessage) -> Result<Option<MessageId>, DriverError>;
    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), DriverError>;
    async fn answer_callback(&self, input: AnswerCallback) -> Result<bool, DriverError>;
    async fn set_commands(&self, commands: &[CommandDescriptor]) -> Result<bool, DriverError>;
    async fn next_update(&self) -> Result<Option<Update>, DriverError>;
    async fn poll(&self) -> Result<usize, DriverError>;
}
