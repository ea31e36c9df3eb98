use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
  action::Action,
  deliver::{deliver, DeliveryOutcome, FileLinks},
  error::TransportError,
  filter::filter,
  present::present,
  query::select,
  retrieve::Retriever,
  source::Sources,
  transport::{ChatId, ChatTransport, Event, MessageRef, UserId},
};

pub const GREETING: &str =
  "Hello! Send me a search query for videos from any website.";
pub const NO_RESULTS: &str =
  "No results found. Please try a different search query.";
pub const NO_VIDEO_RESULTS: &str =
  "No video results found. Please try a different search query.";
pub const SEARCH_DONE: &str =
  "Search completed. If you want to search again, just send a new query.";
pub const DOWNLOADING: &str = "Downloading video... Please wait.";
pub const DOWNLOAD_FAILED: &str = "Sorry, I couldn't download the video. It \
  might not be available or the website might be unsupported. You can try \
  watching it online.";
pub const STALE_ACTION: &str =
  "This button is no longer valid. Please search again.";
pub const GENERIC_ERROR: &str = "An error occurred while processing your \
  request. Please try again later.";

pub struct Bot {
  transport: Arc<dyn ChatTransport>,
  sources: Sources,
  retriever: Retriever,
  links: FileLinks,
}

impl Bot {
  pub fn new(
    transport: Arc<dyn ChatTransport>,
    sources: Sources,
    retriever: Retriever,
    links: FileLinks,
  ) -> Self {
    Self {
      transport,
      sources,
      retriever,
      links,
    }
  }

  /// Handles one inbound event. Failures are logged and reported to the
  /// chat, never propagated.
  pub async fn handle(&self, event: Event) {
    let chat = event.chat();
    if let Err(e) = self.dispatch(event).await {
      error!(chat, "exception while handling an update: {}", e);
      if let Err(e) = self.transport.send_text(chat, GENERIC_ERROR, &[]).await
      {
        error!(chat, "failed to report error: {}", e);
      }
    }
  }

  async fn dispatch(&self, event: Event) -> Result<(), TransportError> {
    match event {
      Event::Start { chat, user } => self.on_start(chat, user).await,
      Event::Text { chat, user, text } => self.on_text(chat, user, &text).await,
      Event::Action {
        chat,
        message,
        action_id,
        token,
      } => self.on_action(chat, message, &action_id, &token).await,
    }
  }

  async fn on_start(
    &self,
    chat: ChatId,
    user: UserId,
  ) -> Result<(), TransportError> {
    info!(user, "start command received");
    self.transport.send_text(chat, GREETING, &[]).await?;
    Ok(())
  }

  async fn on_text(
    &self,
    chat: ChatId,
    user: UserId,
    text: &str,
  ) -> Result<(), TransportError> {
    info!(user, query = text, "received search query");
    let searching = format!("Searching for: {text}");
    self.transport.send_text(chat, &searching, &[]).await?;

    let query = select(text);
    let candidates = self.sources.search(&query).await;
    if candidates.is_empty() {
      self.transport.send_text(chat, NO_RESULTS, &[]).await?;
      return Ok(());
    }

    let results = filter(candidates);
    if results.is_empty() {
      self.transport.send_text(chat, NO_VIDEO_RESULTS, &[]).await?;
      return Ok(());
    }

    for message in present(&results) {
      // one broken result shouldn't hide the others
      if let Err(e) = self
        .transport
        .send_text(chat, &message.text, &message.buttons)
        .await
      {
        error!(chat, "error sending message: {}", e);
      }
    }

    self.transport.send_text(chat, SEARCH_DONE, &[]).await?;
    Ok(())
  }

  async fn on_action(
    &self,
    chat: ChatId,
    message: Option<MessageRef>,
    action_id: &str,
    token: &str,
  ) -> Result<(), TransportError> {
    self.transport.acknowledge(action_id).await?;

    let url = match Action::decode(token) {
      Ok(Action::Download { url }) => url,
      Err(e) => {
        warn!(chat, token, "rejected action token: {}", e);
        self.transport.send_text(chat, STALE_ACTION, &[]).await?;
        return Ok(());
      }
    };

    // the buttons are single use
    if let Some(message) = message {
      self.transport.clear_buttons(message).await?;
    }

    let status = self.transport.send_text(chat, DOWNLOADING, &[]).await?;
    info!(chat, url = %url, "attempting to download video");

    let artifact = match self.retriever.retrieve(&url).await {
      Ok(artifact) => artifact,
      Err(e) => {
        error!(chat, url = %url, "error downloading video: {}", e);
        self.transport.edit_text(status, DOWNLOAD_FAILED).await?;
        return Ok(());
      }
    };

    match deliver(artifact, &*self.transport, &self.links, status).await {
      DeliveryOutcome::Inline => info!(chat, "sent video inline"),
      DeliveryOutcome::Document { file_id } => {
        info!(chat, file_id = %file_id, "sent video as document")
      }
      DeliveryOutcome::Failed => {}
    }

    Ok(())
  }
}
