use async_trait::async_trait;
use itertools::Itertools;
use reqwest::Url;

use crate::{error::SourceError, W};

use super::{Candidate, Source, USER_AGENT};

const BASE_URL: &str = "https://www.pexels.com";
const MAX_RESULTS: usize = 5;

pub struct Pexels {
  client: reqwest::Client,
}

impl Pexels {
  pub fn new(client: reqwest::Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl Source for Pexels {
  fn name(&self) -> &'static str {
    "pexels"
  }

  async fn search(&self, query: &str) -> Result<Vec<Candidate>, SourceError> {
    let url = search_url(query);
    let body = self
      .client
      .get(url)
      .header("User-Agent", USER_AGENT)
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;

    parse_results(&body, MAX_RESULTS)
  }
}

// https://www.pexels.com/search/videos/<query>/
fn search_url(query: &str) -> Url {
  let mut url = Url::parse(BASE_URL).expect("base url is valid");
  url
    .path_segments_mut()
    .expect("base url can have path segments")
    .extend(["search", "videos", query, ""]);
  url
}

fn parse_results(
  html: &str,
  limit: usize,
) -> Result<Vec<Candidate>, SourceError> {
  let dom = tl::parse(html, tl::ParserOptions::default())?;
  let parser = dom.parser();

  let node_iter = dom
    .query_selector("a[href]")
    .expect("selector is hard-coded, thus must be valid");

  let mut candidates = Vec::new();
  for node in node_iter {
    let tag = node
      .get(parser)
      .expect("queried node must be within dom")
      .as_tag()
      .ok_or(SourceError::InvalidHTML("a[href]"))?;

    let Some(path) = W(tag).attr("href").filter(|h| h.starts_with("/video/"))
    else {
      continue;
    };
    // the same video is usually linked from both thumbnail and caption
    if candidates.iter().any(|c: &Candidate| c.url.ends_with(&path)) {
      continue;
    }

    let title = W(tag)
      .find_attr(parser, "img[alt]", "alt")
      .filter(|alt| !alt.trim().is_empty())
      .unwrap_or_else(|| title_from_slug(&path));

    candidates.push(Candidate {
      title,
      url: format!("{BASE_URL}{path}"),
    });

    if candidates.len() == limit {
      break;
    }
  }

  Ok(candidates)
}

// "/video/a-cat-playing-1234567/" -> "A cat playing"
fn title_from_slug(path: &str) -> String {
  let slug = path
    .trim_matches('/')
    .rsplit('/')
    .next()
    .unwrap_or_default();

  let words = slug
    .split('-')
    .filter(|w| !w.is_empty() && !w.chars().all(|c| c.is_ascii_digit()))
    .join(" ");

  let mut chars = words.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::from("Untitled"),
  }
}
