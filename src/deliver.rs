use tracing::{error, info, warn};

use crate::{
  config::BotToken,
  error::DeliveryError,
  retrieve::Artifact,
  transport::{ChatTransport, MessageRef},
};

/// Largest file sent as inline playable media; anything bigger goes out as a
/// document.
pub const INLINE_LIMIT_BYTES: u64 = 50 * 1024 * 1024;

pub const INLINE_CAPTION: &str = "Here's your requested video!";
pub const TOO_LARGE_TEXT: &str = "The video is too large to send via \
  Telegram. You can download it using this link:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Inline,
  Document,
}

pub fn route(size_bytes: u64) -> Route {
  if size_bytes > INLINE_LIMIT_BYTES {
    Route::Document
  } else {
    Route::Inline
  }
}

/// Builds direct download links for uploaded files.
///
/// The links embed the bot token and are as sensitive as the token itself,
/// so they are never logged.
#[derive(Clone)]
pub struct FileLinks {
  api_url: String,
  token: BotToken,
}

impl FileLinks {
  pub fn new(api_url: &str, token: BotToken) -> Self {
    Self {
      api_url: api_url.trim_end_matches('/').to_string(),
      token,
    }
  }

  pub fn link(&self, file_id: &str) -> String {
    format!("{}/file/bot{}/{}", self.api_url, self.token.expose(), file_id)
  }
}

#[derive(Debug)]
pub enum DeliveryOutcome {
  Inline,
  Document { file_id: String },
  // already reported to the chat through the status message
  Failed,
}

pub fn failure_text(err: &DeliveryError) -> String {
  format!("Error sending video: {err}. You can try watching it online instead.")
}

/// Sends `artifact` to the chat of the `status` message and deletes it.
///
/// The artifact is consumed: its file is removed right after the upload
/// attempt, on success, on failure, and when the upload panics.
pub async fn deliver(
  artifact: Artifact,
  transport: &dyn ChatTransport,
  links: &FileLinks,
  status: MessageRef,
) -> DeliveryOutcome {
  let size = artifact.size_bytes();
  let route = route(size);
  info!(chat = status.chat, size, ?route, "delivering video");

  let attempt = match route {
    Route::Inline => send_inline(&artifact, transport, status).await,
    Route::Document => send_document(&artifact, transport, links, status).await,
  };
  drop(artifact);

  match attempt {
    Ok(outcome) => outcome,
    Err(e) => {
      error!(chat = status.chat, "error sending video: {}", e);
      let text = failure_text(&e);
      if let Err(edit_err) = transport.edit_text(status, &text).await {
        warn!("failed to report delivery error: {}", edit_err);
      }
      DeliveryOutcome::Failed
    }
  }
}

async fn send_inline(
  artifact: &Artifact,
  transport: &dyn ChatTransport,
  status: MessageRef,
) -> Result<DeliveryOutcome, DeliveryError> {
  transport
    .send_media(status.chat, artifact.path(), INLINE_CAPTION)
    .await?;

  // the video is out, a stale status line is only cosmetic
  if let Err(e) = transport.delete_message(status).await {
    warn!("failed to delete status message: {}", e);
  }
  Ok(DeliveryOutcome::Inline)
}

async fn send_document(
  artifact: &Artifact,
  transport: &dyn ChatTransport,
  links: &FileLinks,
  status: MessageRef,
) -> Result<DeliveryOutcome, DeliveryError> {
  transport.edit_text(status, TOO_LARGE_TEXT).await?;
  let file_id = transport
    .send_document(status.chat, artifact.path(), &artifact.file_name())
    .await?;
  transport
    .send_text(status.chat, &links.link(&file_id), &[])
    .await?;

  Ok(DeliveryOutcome::Document { file_id })
}
