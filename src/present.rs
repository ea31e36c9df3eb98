use tracing::debug;

use crate::{action::Action, filter::VideoResult, transport::Button};

pub const DOWNLOAD_LABEL: &str = "Download";
pub const WATCH_LABEL: &str = "Watch Online";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
  pub text: String,
  pub buttons: Vec<Button>,
}

pub fn present(results: &[VideoResult]) -> Vec<OutboundMessage> {
  results.iter().map(present_one).collect()
}

fn present_one(result: &VideoResult) -> OutboundMessage {
  let title = match result.title.trim() {
    "" => "Untitled",
    title => title,
  };
  let text = format!(
    "Title: {title}\n\n\
     Click '{DOWNLOAD_LABEL}' to get the video or '{WATCH_LABEL}' to view it \
     in your browser.\n\n\
     URL: {}",
    result.url
  );

  let mut buttons = Vec::with_capacity(2);
  let download = Action::Download {
    url: result.url.clone(),
  };
  match download.encode() {
    Ok(token) => buttons.push(Button::Callback {
      label: DOWNLOAD_LABEL.to_string(),
      token,
    }),
    // the url can't travel in a callback token, offer the link only
    Err(e) => debug!(url = %result.url, "no download button: {}", e),
  }
  buttons.push(Button::Link {
    label: WATCH_LABEL.to_string(),
    url: result.url.clone(),
  });

  OutboundMessage { text, buttons }
}
