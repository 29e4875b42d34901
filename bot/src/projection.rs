//! Turns raw [`Update`]s into typed events a machine can `react` to.
//! Grounded on `original_source/Telegram/projections.hpp`'s `or_else`
//! chain of per-update-kind projectors, realized here as a `match` over
//! `Update` followed by early-return `Option` chaining.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::driver::{Callback, ChatId, CommandDescriptor, Message, MessageId, Update};

/// A static command descriptor: prefix and description, known at compile
/// time via `#[derive(forest_macros::Command)]`.
pub trait Command {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
}

/// A static button descriptor: the payload type carried in its callback
/// data, known at compile time via `#[derive(forest_macros::Button)]`.
pub trait Button {
    type Payload: Serialize + DeserializeOwned;
}

#[derive(Debug, Clone)]
pub struct CommandEvent<Cmd> {
    pub chat_id: ChatId,
    pub parameters: Vec<String>,
    _marker: PhantomData<Cmd>,
}

#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ButtonEvent<Bn: Button> {
    pub chat_id: ChatId,
    pub message_id: Option<MessageId>,
    pub callback_id: String,
    pub payload: Bn::Payload,
}

/// The untyped result of running the projection pipeline over one update;
/// [`into_command_event`] and [`into_button_event`] attempt to narrow it
/// to a concrete `Cmd`/`Bn` the caller is interested in.
#[derive(Debug, Clone)]
pub enum Projected {
    Command { prefix: String, chat_id: ChatId, parameters: Vec<String> },
    Message(MessageEvent),
    Button { chat_id: ChatId, message_id: Option<MessageId>, callback_id: String, raw: String },
}

/// The ordered union pipeline: command, then plain message, for
/// new-message updates; button for callbacks; edited messages project to
/// nothing.
pub fn project(update: &Update, commands: &[CommandDescriptor]) -> Option<Projected> {
    match update {
        Update::NewMessage(message) => project_command(message, commands).or_else(|| project_message(message)),
        Update::EditedMessage(_) => None,
        Update::Callback(callback) => project_button(callback),
    }
}

fn project_command(message: &Message, commands: &[CommandDescriptor]) -> Option<Projected> {
    let rest = message.text.strip_prefix('/')?;
    let mut tokens = rest.split_whitespace();
    let prefix = tokens.next()?;
    if !commands.iter().any(|c| c.prefix == prefix) {
        return None;
    }
    Some(Projected::Command {
        prefix: prefix.to_string(),
        chat_id: message.chat_id,
        parameters: tokens.map(str::to_string).collect(),
    })
}

fn project_message(message: &Message) -> Option<Projected> {
    Some(Projected::Message(MessageEvent {
        chat_id: message.chat_id,
        message_id: message.message_id,
        text: message.text.clone(),
    }))
}

fn project_button(callback: &Callback) -> Option<Projected> {
    let data = callback.data.clone()?;
    Some(Projected::Button {
        chat_id: callback.message.as_ref().map(|m| m.chat_id).unwrap_or_default(),
        message_id: callback.message.as_ref().map(|m| m.message_id),
        callback_id: callback.id.clone(),
        raw: data,
    })
}

/// Narrows a [`Projected::Command`] to `Cmd` if its prefix matches.
pub fn into_command_event<Cmd: Command>(projected: &Projected) -> Option<CommandEvent<Cmd>> {
    match projected {
        Projected::Command { prefix, chat_id, parameters } if prefix == Cmd::NAME => {
            Some(CommandEvent { chat_id: *chat_id, parameters: parameters.clone(), _marker: PhantomData })
        }
        _ => None,
    }
}

/// Narrows a [`Projected::Button`] to `Bn` via `registry`, dropping the
/// callback silently on any decode failure or index mismatch.
pub fn into_button_event<Bn: Button + 'static>(
    projected: &Projected,
    registry: &crate::codec::ButtonRegistry,
) -> Option<ButtonEvent<Bn>> {
    match projected {
        Projected::Button { chat_id, message_id, callback_id, raw } => {
            let payload = registry.decode::<Bn>(raw)?;
            Some(ButtonEvent { chat_id: *chat_id, message_id: *message_id, callback_id: callback_id.clone(), payload })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::User;

    struct Dialogue1;
    impl Command for Dialogue1 {
        const NAME: &'static str = "dialogue1";
        const DESCRIPTION: &'static str = "start dialogue 1";
    }

    fn message(text: &str) -> Message {
        Message { chat_id: 1, message_id: 1, timestamp: 0, from: None, reply_to: None, text: text.to_string() }
    }

    #[test]
    fn recognized_command_yields_an_event() {
        let commands = [CommandDescriptor::of::<Dialogue1>()];
        let update = Update::NewMessage(message("/dialogue1 foo bar"));
        let projected = project(&update, &commands).unwrap();
        let event = into_command_event::<Dialogue1>(&projected).unwrap();
        assert_eq!(event.parameters, vec!["foo", "bar"]);
    }

    #[test]
    fn bare_word_is_not_a_command() {
        let commands = [CommandDescriptor::of::<Dialogue1>()];
        let update = Update::NewMessage(message("dialogue1"));
        match project(&update, &commands) {
            Some(Projected::Message(_)) => {}
            other => panic!("expected a plain message projection, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_command_falls_back_to_a_plain_message() {
        let commands = [CommandDescriptor::of::<Dialogue1>()];
        let update = Update::NewMessage(message("/unknown"));
        match project(&update, &commands) {
            Some(Projected::Message(_)) => {}
            other => panic!("expected a plain message projection, got {other:?}"),
        }
    }

    #[test]
    fn callback_without_data_projects_nothing() {
        let callback = Callback { id: "1".into(), user: User { id: 1, username: None }, message: None, data: None };
        assert!(project_button(&callback).is_none());
    }
}
