mod duckduckgo;
mod pexels;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

pub use duckduckgo::DuckDuckGo;
pub use pexels::Pexels;

use crate::{
  error::SourceError,
  query::{Provider, SearchQuery},
};

// browsers get the real pages, default reqwest agents get captchas
pub(crate) const USER_AGENT: &str =
  "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub title: String,
  pub url: String,
}

#[async_trait]
pub trait Source: Send + Sync {
  fn name(&self) -> &'static str;
  async fn search(&self, query: &str) -> Result<Vec<Candidate>, SourceError>;
}

/// The pair of providers a [`SearchQuery`] can be routed to.
#[derive(Clone)]
pub struct Sources {
  default: Arc<dyn Source>,
  alternate: Arc<dyn Source>,
}

impl Sources {
  pub fn new(default: Arc<dyn Source>, alternate: Arc<dyn Source>) -> Self {
    Self { default, alternate }
  }

  // fails open: a broken provider looks like one with no results
  pub async fn search(&self, query: &SearchQuery) -> Vec<Candidate> {
    let source = match query.provider() {
      Provider::Default => &self.default,
      Provider::Alternate => &self.alternate,
    };

    info!(source = source.name(), query = query.text(), "searching");
    match source.search(query.text()).await {
      Ok(candidates) => {
        info!(source = source.name(), "found {} results", candidates.len());
        candidates
      }
      Err(e) => {
        error!(source = source.name(), "search failed: {}", e);
        vec![]
      }
    }
  }
}
