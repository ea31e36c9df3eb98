use std::{path::PathBuf, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("http client error: {0}")]
  Http(#[from] reqwest::Error),
  #[error("io error: {0}")]
  IO(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("missing required variable {0}")]
  Missing(&'static str),
  #[error("invalid value for {0}: {1}")]
  Invalid(&'static str, String),
}

// failures of a search provider. never shown to the user verbatim, the
// pipeline degrades them to an empty result list.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("invalid html: {0}")]
  InvalidHTML(&'static str),
}

impl From<tl::ParseError> for SourceError {
  fn from(_: tl::ParseError) -> Self {
    SourceError::InvalidHTML("document")
  }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
  #[error("unsupported url: {0}")]
  Unsupported(String),
  #[error("extraction failed: {0}")]
  Extraction(String),
  #[error("extractor reported {0} but no such file exists")]
  MissingOutput(PathBuf),
  #[error("extraction timed out after {0:?}")]
  TimedOut(Duration),
  #[error("extraction task aborted: {0}")]
  Aborted(String),
  #[error("io error: {0}")]
  IO(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
  #[error(transparent)]
  Transport(#[from] TransportError),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
  #[error("{method} failed: {source}")]
  Request {
    method: &'static str,
    source: teloxide::RequestError,
  },
  #[error("{method} rejected: {description}")]
  Api {
    method: &'static str,
    description: String,
  },
}

impl TransportError {
  pub fn request(method: &'static str, err: teloxide::RequestError) -> Self {
    let source = match err {
      // request urls embed the bot token
      teloxide::RequestError::Network(e) => {
        teloxide::RequestError::Network(e.without_url())
      }
      other => other,
    };
    TransportError::Request { method, source }
  }
}
