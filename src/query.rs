use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

// queries mentioning this keyword are routed to the pexels scraper
pub const ALTERNATE_KEYWORD: &str = "pexels";

// appended to default-provider queries to bias them towards videos
pub const VIDEO_HINT: &str = "video";

static ALTERNATE_KEYWORD_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(&format!("(?i){}", regex::escape(ALTERNATE_KEYWORD))).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
  Default,
  Alternate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  provider: Provider,
  text: String,
}

impl SearchQuery {
  pub fn provider(&self) -> Provider {
    self.provider
  }

  /// The query text to hand to the selected provider.
  pub fn text(&self) -> &str {
    &self.text
  }
}

pub fn select(query: &str) -> SearchQuery {
  if query.to_lowercase().contains(ALTERNATE_KEYWORD) {
    let stripped = ALTERNATE_KEYWORD_REGEX.replace_all(query, " ");
    let text = stripped.split_whitespace().join(" ");
    return SearchQuery {
      provider: Provider::Alternate,
      text,
    };
  }

  let text = format!("{} {VIDEO_HINT}", query.trim());
  SearchQuery {
    provider: Provider::Default,
    text,
  }
}
