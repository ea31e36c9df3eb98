mod ytdlp;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::RetrievalError;

pub use ytdlp::Ytdlp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
  // file name template, relative to the request's output directory
  pub output_template: String,
  pub format: String,
  pub playlist: bool,
  pub warnings: bool,
  pub ignore_errors: bool,
}

impl Default for ExtractOptions {
  fn default() -> Self {
    Self {
      output_template: "%(title)s.%(ext)s".to_string(),
      format: "best".to_string(),
      playlist: false,
      warnings: false,
      ignore_errors: false,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ExtractRequest {
  pub url: String,
  pub output_dir: PathBuf,
  pub options: ExtractOptions,
}

#[derive(Debug)]
pub struct Extracted {
  /// Where the extractor claims to have written the media.
  pub path: PathBuf,
}

#[async_trait]
pub trait Extractor: Send + Sync {
  async fn extract(
    &self,
    request: &ExtractRequest,
  ) -> Result<Extracted, RetrievalError>;
}
