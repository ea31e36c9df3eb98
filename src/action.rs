//! Encoding of the state carried by inline buttons.
//!
//! There is no session store: everything a button needs to resume the
//! conversation is packed into its callback token as `<kind>:<payload>`. The
//! kind tag carries a version so that tokens from older builds can be told
//! apart and rejected.

use std::fmt;

const DOWNLOAD_PREFIX: &str = "dl1:";

/// Telegram refuses callback data longer than this.
pub const MAX_TOKEN_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Download { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
  #[error("unknown action kind")]
  UnknownKind,
  #[error("invalid url in action")]
  InvalidUrl,
  #[error("action token is {0} bytes long")]
  TooLong(usize),
}

impl Action {
  /// Fails for anything [`Action::decode`] would not give back unchanged.
  pub fn encode(&self) -> Result<String, ActionError> {
    match self {
      Action::Download { url } => check_url(url)?,
    }

    let token = self.to_string();
    if token.len() > MAX_TOKEN_LEN {
      return Err(ActionError::TooLong(token.len()));
    }
    Ok(token)
  }

  pub fn decode(token: &str) -> Result<Self, ActionError> {
    let url = token
      .strip_prefix(DOWNLOAD_PREFIX)
      .ok_or(ActionError::UnknownKind)?;

    check_url(url)?;

    Ok(Action::Download {
      url: url.to_string(),
    })
  }
}

// the url ends up as a command line argument of the extractor
fn check_url(url: &str) -> Result<(), ActionError> {
  let is_http = url.starts_with("https://") || url.starts_with("http://");
  if !is_http || url.chars().any(char::is_whitespace) {
    return Err(ActionError::InvalidUrl);
  }
  Ok(())
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Action::Download { url } => write!(f, "{DOWNLOAD_PREFIX}{url}"),
    }
  }
}
