use std::path::Path;

use async_trait::async_trait;

use crate::error::TransportError;

pub type ChatId = i64;
pub type UserId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
  pub chat: ChatId,
  pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
  // routed back to the bot as an `Event::Action`
  Callback { label: String, token: String },
  // opened by the client, never reaches the bot
  Link { label: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  Start {
    chat: ChatId,
    user: UserId,
  },
  Text {
    chat: ChatId,
    user: UserId,
    text: String,
  },
  Action {
    chat: ChatId,
    // the message holding the pressed button
    message: Option<MessageRef>,
    action_id: String,
    token: String,
  },
}

impl Event {
  pub fn chat(&self) -> ChatId {
    match self {
      Event::Start { chat, .. }
      | Event::Text { chat, .. }
      | Event::Action { chat, .. } => *chat,
    }
  }
}

/// The chat service as seen by the bot. Every button is laid out on a row
/// of its own.
#[async_trait]
pub trait ChatTransport: Send + Sync {
  async fn send_text(
    &self,
    chat: ChatId,
    text: &str,
    buttons: &[Button],
  ) -> Result<MessageRef, TransportError>;

  async fn send_media(
    &self,
    chat: ChatId,
    file: &Path,
    caption: &str,
  ) -> Result<MessageRef, TransportError>;

  /// Returns the remote file id of the uploaded document.
  async fn send_document(
    &self,
    chat: ChatId,
    file: &Path,
    filename: &str,
  ) -> Result<String, TransportError>;

  async fn edit_text(
    &self,
    message: MessageRef,
    text: &str,
  ) -> Result<(), TransportError>;

  async fn clear_buttons(&self, message: MessageRef)
    -> Result<(), TransportError>;

  async fn delete_message(
    &self,
    message: MessageRef,
  ) -> Result<(), TransportError>;

  // stops the client's spinner on the pressed button
  async fn acknowledge(&self, action_id: &str) -> Result<(), TransportError>;
}
