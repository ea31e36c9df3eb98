use async_trait::async_trait;
use reqwest::Url;

use crate::{error::SourceError, W};

use super::{Candidate, Source, USER_AGENT};

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
const MAX_RESULTS: usize = 10;

// scrapes the javascript-free duckduckgo results page
pub struct DuckDuckGo {
  client: reqwest::Client,
}

impl DuckDuckGo {
  pub fn new(client: reqwest::Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl Source for DuckDuckGo {
  fn name(&self) -> &'static str {
    "duckduckgo"
  }

  async fn search(&self, query: &str) -> Result<Vec<Candidate>, SourceError> {
    let body = self
      .client
      .get(SEARCH_URL)
      .query(&[("q", query)])
      .header("User-Agent", USER_AGENT)
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;

    parse_results(&body, MAX_RESULTS)
  }
}

fn parse_results(
  html: &str,
  limit: usize,
) -> Result<Vec<Candidate>, SourceError> {
  let dom = tl::parse(html, tl::ParserOptions::default())?;
  let parser = dom.parser();

  let mut candidates = Vec::new();
  let node_iter = dom
    .query_selector("a.result__a")
    .expect("selector is hard-coded, thus must be valid");

  for node in node_iter {
    let tag = node
      .get(parser)
      .expect("queried node must be within dom")
      .as_tag()
      .ok_or(SourceError::InvalidHTML("a.result__a"))?;

    let Some(url) = W(tag).attr("href").and_then(|h| resolve_href(&h)) else {
      continue;
    };

    candidates.push(Candidate {
      title: W(tag).text(parser),
      url,
    });

    if candidates.len() == limit {
      break;
    }
  }

  Ok(candidates)
}

// result links go through a `/l/?uddg=<target>` redirect; sponsored ones
// through `/y.js` and are dropped.
fn resolve_href(href: &str) -> Option<String> {
  let absolute = match href {
    h if h.starts_with("//") => format!("https:{h}"),
    h if h.starts_with('/') => format!("https://duckduckgo.com{h}"),
    h => h.to_string(),
  };
  let url = Url::parse(&absolute).ok()?;

  let is_ddg = url
    .host_str()
    .is_some_and(|host| host.ends_with("duckduckgo.com"));
  if !is_ddg {
    return Some(url.into());
  }

  if url.path() != "/l/" {
    return None;
  }

  let target = url
    .query_pairs()
    .find_map(|(k, v)| (k == "uddg").then_some(v))?;
  // the target arrives percent-decoded, parsing encodes it again
  Url::parse(&target).ok().map(String::from)
}

#[cfg(test)]
mod tests {
  use super::*;

  const RESULTS_PAGE: &str = r#"
    <div class="results">
      <div class="result results_links result--ad">
        <a class="result__a" href="https://duckduckgo.com/y.js?ad_domain=shop.com&amp;u3=x">Buy cats</a>
      </div>
      <div class="result results_links">
        <h2 class="result__title">
          <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc&amp;rut=deadbeef">Funny <b>Cats</b> Compilation</a>
        </h2>
        <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fignored.com">snippet</a>
      </div>
      <div class="result results_links">
        <a rel="nofollow" class="result__a" href="https://en.wikipedia.org/wiki/Cat">Cat - Wikipedia</a>
      </div>
      <div class="result results_links">
        <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fvimeo.com%2F42&amp;rut=x">Tom &amp; Jerry clip</a>
      </div>
    </div>
  "#;

  #[test]
  fn test_parse_results() {
    let candidates = parse_results(RESULTS_PAGE, 10).unwrap();
    assert_eq!(
      candidates,
      vec![
        Candidate {
          title: "Funny Cats Compilation".into(),
          url: "https://www.youtube.com/watch?v=abc".into(),
        },
        Candidate {
          title: "Cat - Wikipedia".into(),
          url: "https://en.wikipedia.org/wiki/Cat".into(),
        },
        Candidate {
          title: "Tom & Jerry clip".into(),
          url: "https://vimeo.com/42".into(),
        },
      ]
    );
  }

  #[test]
  fn test_parse_results_respects_limit() {
    let candidates = parse_results(RESULTS_PAGE, 1).unwrap();
    assert_eq!(candidates.len(), 1);
  }

  #[test]
  fn test_empty_page() {
    let candidates = parse_results("<html><body></body></html>", 10).unwrap();
    assert!(candidates.is_empty());
  }

  #[test]
  fn test_resolve_href() {
    assert_eq!(
      resolve_href("/l/?uddg=https%3A%2F%2Fa.org%2Fx.mp4").as_deref(),
      Some("https://a.org/x.mp4")
    );
    assert_eq!(
      resolve_href(
        "//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.org%2Fmy%20clip.mp4&rut=x"
      )
      .as_deref(),
      Some("https://a.org/my%20clip.mp4")
    );
    assert_eq!(resolve_href("//duckduckgo.com/l/?uddg=garbage"), None);
    assert_eq!(resolve_href("//duckduckgo.com/y.js?u3=x"), None);
    assert_eq!(resolve_href("not a url"), None);
  }
}
