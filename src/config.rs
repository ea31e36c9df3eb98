use std::{fmt, path::PathBuf, time::Duration};

use reqwest::Url;

use crate::error::ConfigError;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const DEFAULT_LOG_FILE: &str = "bot.log";

/// Process-wide settings, read once at startup and handed to the components
/// that need them.
#[derive(Debug, Clone)]
pub struct Config {
  pub bot_token: BotToken,
  pub api_url: Url,
  pub download_dir: PathBuf,
  pub download_timeout: Duration,
  pub ytdlp_path: String,
  pub ytdlp_proxy: Option<String>,
  pub log_file: Option<PathBuf>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
  pub fn new(token: impl Into<String>) -> Self {
    Self(token.into())
  }

  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for BotToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("BotToken(<REDACTED>)")
  }
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    // a missing .env file is fine, the variables may come from the shell
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, ConfigError> {
    let bot_token = lookup("TELEGRAM_BOT_TOKEN")
      .filter(|s| !s.trim().is_empty())
      .map(|s| BotToken::new(s.trim()))
      .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

    let api_url = lookup("TELEGRAM_API_URL")
      .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = Url::parse(&api_url)
      .map_err(|_| ConfigError::Invalid("TELEGRAM_API_URL", api_url))?;

    let download_dir = lookup("DOWNLOAD_DIR")
      .map(PathBuf::from)
      .unwrap_or_else(|| std::env::temp_dir().join("video-fetch-bot"));

    let download_timeout = match lookup("DOWNLOAD_TIMEOUT_SECS") {
      None => DEFAULT_DOWNLOAD_TIMEOUT,
      Some(s) => s
        .parse::<u64>()
        .ok()
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .ok_or(ConfigError::Invalid("DOWNLOAD_TIMEOUT_SECS", s))?,
    };

    let ytdlp_path =
      lookup("YTDLP_PATH").unwrap_or_else(|| "yt-dlp".to_string());
    let ytdlp_proxy = lookup("YTDLP_PROXY").filter(|s| !s.is_empty());

    // an explicitly empty LOG_FILE turns file logging off
    let log_file = match lookup("LOG_FILE") {
      None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
      Some(s) if s.is_empty() => None,
      Some(s) => Some(PathBuf::from(s)),
    };

    Ok(Self {
      bot_token,
      api_url,
      download_dir,
      download_timeout,
      ytdlp_path,
      ytdlp_proxy,
      log_file,
    })
  }
}
