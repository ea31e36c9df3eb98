use itertools::Itertools;
use tl::{HTMLTag, Parser};

use super::{decode_html_entities, W};

impl<'a> W<&HTMLTag<'a>> {
  pub fn attr(&self, name: &str) -> Option<String> {
    self
      .0
      .attributes()
      .get(name)
      .flatten()
      .map(|value| decode_html_entities(&value.as_utf8_str()))
  }

  // whitespace-normalized inner text
  pub fn text(&self, parser: &Parser<'a>) -> String {
    let text = self.0.inner_text(parser);
    let text = text.split_whitespace().join(" ");
    decode_html_entities(&text)
  }

  pub fn find_attr(
    &self,
    parser: &Parser<'a>,
    selector: &str,
    name: &str,
  ) -> Option<String> {
    self
      .0
      .query_selector(parser, selector)?
      .filter_map(|handle| handle.get(parser))
      .filter_map(|node| node.as_tag())
      .find_map(|tag| W(tag).attr(name))
  }
}
