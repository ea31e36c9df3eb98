use teloxide::{
  payloads::setters::*,
  requests::Requester,
  types::{AllowedUpdate, CallbackQuery, Message, Update, UpdateKind},
  Bot,
};
use tracing::debug;

use super::message_ref;
use crate::{
  error::TransportError,
  transport::{ChatId, Event, UserId},
};

const LONG_POLL_SECS: u32 = 30;

pub struct Poller {
  bot: Bot,
  offset: i32,
}

impl Poller {
  pub fn new(bot: Bot) -> Self {
    Self { bot, offset: 0 }
  }

  /// Waits for the next batch of updates and confirms them, so each update
  /// is handed out once.
  pub async fn next_batch(&mut self) -> Result<Vec<Event>, TransportError> {
    let updates = self
      .bot
      .get_updates()
      .offset(self.offset)
      .timeout(LONG_POLL_SECS)
      .allowed_updates(vec![
        AllowedUpdate::Message,
        AllowedUpdate::CallbackQuery,
      ])
      .await
      .map_err(|e| TransportError::request("getUpdates", e))?;

    if let Some(last) = updates.iter().map(|u| u.id).max() {
      self.offset = last + 1;
    }
    debug!(count = updates.len(), offset = self.offset, "received updates");

    Ok(updates.into_iter().filter_map(into_event).collect())
  }
}

fn into_event(update: Update) -> Option<Event> {
  match update.kind {
    UpdateKind::Message(message) => message_event(&message),
    UpdateKind::CallbackQuery(query) => action_event(query),
    _ => None,
  }
}

fn message_event(message: &Message) -> Option<Event> {
  let user = message.from().map(|u| u.id.0).unwrap_or_default();
  text_event(message.chat.id.0, user, message.text()?)
}

fn action_event(query: CallbackQuery) -> Option<Event> {
  let token = query.data?;
  let message = query.message.as_ref().map(message_ref);
  let chat = match message {
    Some(message) => message.chat,
    // a callback without its message can only come from a private chat
    None => i64::try_from(query.from.id.0).ok()?,
  };

  Some(Event::Action {
    chat,
    message,
    action_id: query.id,
    token,
  })
}

// `/start` greets, other commands are ignored, the rest is a search
fn text_event(chat: ChatId, user: UserId, text: &str) -> Option<Event> {
  let text = text.trim();
  match text.split_whitespace().next()? {
    // "/start" or "/start@SomeBot"
    cmd if cmd == "/start" || cmd.starts_with("/start@") => {
      Some(Event::Start { chat, user })
    }
    cmd if cmd.starts_with('/') => None,
    _ => Some(Event::Text {
      chat,
      user,
      text: text.to_string(),
    }),
  }
}
