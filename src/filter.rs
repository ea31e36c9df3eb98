use crate::source::Candidate;

pub const MAX_RESULTS: usize = 5;

const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".avi", ".mov", ".flv", ".wmv"];

const VIDEO_SITES: &[&str] = &[
  "youtube.com",
  "vimeo.com",
  "dailymotion.com",
  "twitch.tv",
  "pexels.com",
  "pixabay.com",
];

const TITLE_KEYWORDS: &[&str] = &["video", "clip", "footage"];

/// A candidate that passed [`filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoResult {
  pub title: String,
  pub url: String,
}

/// One heuristic for telling video pages apart from the rest of the search
/// results.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
  UrlContains(&'static [&'static str]),
  TitleContains(&'static [&'static str]),
}

pub const SIGNALS: &[Signal] = &[
  Signal::UrlContains(VIDEO_EXTENSIONS),
  // plain substring match, not host parsing
  Signal::UrlContains(VIDEO_SITES),
  Signal::TitleContains(TITLE_KEYWORDS),
];

impl Signal {
  pub fn matches(&self, candidate: &Candidate) -> bool {
    match self {
      Signal::UrlContains(needles) => contains_any(&candidate.url, needles),
      Signal::TitleContains(needles) => contains_any(&candidate.title, needles),
    }
  }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
  let haystack = haystack.to_lowercase();
  needles.iter().any(|needle| haystack.contains(needle))
}

pub fn is_video_like(candidate: &Candidate) -> bool {
  SIGNALS.iter().any(|signal| signal.matches(candidate))
}

// candidates after the fifth accepted one are never looked at
pub fn filter(candidates: Vec<Candidate>) -> Vec<VideoResult> {
  candidates
    .into_iter()
    .filter(is_video_like)
    .take(MAX_RESULTS)
    .map(|c| VideoResult {
      title: c.title,
      url: c.url,
    })
    .collect()
}
