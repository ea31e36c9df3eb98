mod poller;

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::Url;
use teloxide::{
  payloads::setters::*,
  requests::Requester,
  types::{self as tg, InlineKeyboardButton, InlineKeyboardMarkup, InputFile},
  Bot,
};
use tracing::{debug, warn};

pub use poller::Poller;

use crate::{
  config::BotToken,
  error::TransportError,
  transport::{Button, ChatId, ChatTransport, MessageRef},
};

// teloxide's stock 17s would cut off long polls and large uploads
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// The Bot API as a [`ChatTransport`].
pub struct Telegram {
  bot: Bot,
}

impl Telegram {
  pub fn new(token: &BotToken, api_url: Url) -> Result<Self, reqwest::Error> {
    let client = teloxide::net::default_reqwest_settings()
      .timeout(REQUEST_TIMEOUT)
      .build()?;
    let bot = Bot::with_client(token.expose(), client).set_api_url(api_url);
    Ok(Self { bot })
  }

  pub fn poller(&self) -> Poller {
    Poller::new(self.bot.clone())
  }
}

fn message_ref(message: &tg::Message) -> MessageRef {
  MessageRef {
    chat: message.chat.id.0,
    id: message.id.0,
  }
}

fn failed(
  method: &'static str,
) -> impl FnOnce(teloxide::RequestError) -> TransportError {
  move |err| TransportError::request(method, err)
}

// one button per row. links the client would refuse are left out.
fn keyboard(buttons: &[Button]) -> InlineKeyboardMarkup {
  let rows = buttons
    .iter()
    .filter_map(|button| match button {
      Button::Callback { label, token } => {
        Some(InlineKeyboardButton::callback(label.clone(), token.clone()))
      }
      Button::Link { label, url } => match Url::parse(url) {
        Ok(url) => Some(InlineKeyboardButton::url(label.clone(), url)),
        Err(e) => {
          warn!(url = %url, "dropping link button: {}", e);
          None
        }
      },
    })
    .map(|button| vec![button]);

  InlineKeyboardMarkup::new(rows)
}

#[async_trait]
impl ChatTransport for Telegram {
  async fn send_text(
    &self,
    chat: ChatId,
    text: &str,
    buttons: &[Button],
  ) -> Result<MessageRef, TransportError> {
    let mut request = self.bot.send_message(tg::ChatId(chat), text);
    if !buttons.is_empty() {
      request = request.reply_markup(keyboard(buttons));
    }

    let message = request.await.map_err(failed("sendMessage"))?;
    Ok(message_ref(&message))
  }

  async fn send_media(
    &self,
    chat: ChatId,
    file: &Path,
    caption: &str,
  ) -> Result<MessageRef, TransportError> {
    debug!(chat, path = %file.display(), "uploading video");
    let message = self
      .bot
      .send_video(tg::ChatId(chat), InputFile::file(file))
      .caption(caption)
      .supports_streaming(true)
      .await
      .map_err(failed("sendVideo"))?;
    Ok(message_ref(&message))
  }

  async fn send_document(
    &self,
    chat: ChatId,
    file: &Path,
    filename: &str,
  ) -> Result<String, TransportError> {
    debug!(chat, path = %file.display(), "uploading document");
    let document = InputFile::file(file).file_name(filename.to_owned());
    let message = self
      .bot
      .send_document(tg::ChatId(chat), document)
      .await
      .map_err(failed("sendDocument"))?;

    message
      .document()
      .map(|document| document.file.id.clone())
      .ok_or(TransportError::Api {
        method: "sendDocument",
        description: "response carries no document".into(),
      })
  }

  async fn edit_text(
    &self,
    message: MessageRef,
    text: &str,
  ) -> Result<(), TransportError> {
    self
      .bot
      .edit_message_text(
        tg::ChatId(message.chat),
        tg::MessageId(message.id),
        text,
      )
      .await
      .map_err(failed("editMessageText"))?;
    Ok(())
  }

  async fn clear_buttons(
    &self,
    message: MessageRef,
  ) -> Result<(), TransportError> {
    // without a reply_markup the keyboard is removed
    self
      .bot
      .edit_message_reply_markup(
        tg::ChatId(message.chat),
        tg::MessageId(message.id),
      )
      .await
      .map_err(failed("editMessageReplyMarkup"))?;
    Ok(())
  }

  async fn delete_message(
    &self,
    message: MessageRef,
  ) -> Result<(), TransportError> {
    self
      .bot
      .delete_message(tg::ChatId(message.chat), tg::MessageId(message.id))
      .await
      .map_err(failed("deleteMessage"))?;
    Ok(())
  }

  async fn acknowledge(&self, action_id: &str) -> Result<(), TransportError> {
    self
      .bot
      .answer_callback_query(action_id)
      .await
      .map_err(failed("answerCallbackQuery"))?;
    Ok(())
  }
}
