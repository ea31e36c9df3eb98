use std::sync::LazyLock;

use regex::Regex;

mod tag_ext;

#[derive(Default)]
pub struct W<T>(pub T);

// used to remove cred info from proxy url before printing
static AUTH_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"//[^:/@]+(:[^@]+)?@").unwrap());

pub fn redact_credentials(url: &str) -> String {
  AUTH_REGEX.replace(url, "//<REDACTED>@").into_owned()
}

// tl hands out raw attribute and text bytes, entities included
pub fn decode_html_entities(s: &str) -> String {
  if !s.contains('&') {
    return s.to_string();
  }

  s.replace("&quot;", "\"")
    .replace("&#x27;", "'")
    .replace("&#39;", "'")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&nbsp;", " ")
    .replace("&amp;", "&")
}
