use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod action;
mod bot;
mod config;
mod deliver;
mod error;
mod extractor;
mod filter;
mod present;
mod query;
mod retrieve;
mod source;
mod telegram;
mod transport;
mod util;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use util::W;

use crate::{
  bot::Bot,
  config::Config,
  deliver::FileLinks,
  extractor::Ytdlp,
  retrieve::Retriever,
  source::{DuckDuckGo, Pexels, Sources},
  telegram::{Poller, Telegram},
};

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
  let config = Config::from_env()?;
  let _guard = init_logging(&config);
  info!(
    download_dir = %config.download_dir.display(),
    timeout = ?config.download_timeout,
    "starting"
  );

  tokio::fs::create_dir_all(&config.download_dir).await?;

  let client = reqwest::Client::builder().build()?;
  let telegram = Arc::new(Telegram::new(
    &config.bot_token,
    config.api_url.clone(),
  )?);
  let sources = Sources::new(
    Arc::new(DuckDuckGo::new(client.clone())),
    Arc::new(Pexels::new(client)),
  );
  let retriever = Retriever::new(
    Arc::new(Ytdlp::new(&config.ytdlp_path, config.ytdlp_proxy.clone())),
    config.download_dir.clone(),
    config.download_timeout,
  );
  let links = FileLinks::new(config.api_url.as_str(), config.bot_token.clone());
  let bot = Arc::new(Bot::new(telegram.clone(), sources, retriever, links));

  let shutdown = CancellationToken::new();
  tokio::spawn({
    let shutdown = shutdown.clone();
    async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        info!("received interrupt, shutting down");
      }
      shutdown.cancel();
    }
  });

  run(telegram.poller(), bot, shutdown).await;
  info!("stopped");
  Ok(())
}

async fn run(mut poller: Poller, bot: Arc<Bot>, shutdown: CancellationToken) {
  info!("polling for updates");
  loop {
    let batch = tokio::select! {
      _ = shutdown.cancelled() => break,
      batch = poller.next_batch() => batch,
    };

    match batch {
      Ok(events) => {
        // each update runs on its own task so a long download never blocks
        // other chats
        for event in events {
          let bot = bot.clone();
          tokio::spawn(async move { bot.handle(event).await });
        }
      }
      Err(e) => {
        warn!("failed to fetch updates: {}", e);
        tokio::select! {
          _ = shutdown.cancelled() => break,
          _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
        }
      }
    }
  }
}

// stderr always, plus a plain-text log file unless disabled. the returned
// guard flushes the file writer when dropped.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("info"));

  let (file_layer, guard) = match &config.log_file {
    Some(path) => {
      let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
      let name = path.file_name().unwrap_or(path.as_os_str());
      let appender = tracing_appender::rolling::never(dir, name);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      let layer = fmt::layer().with_writer(writer).with_ansi(false);
      (Some(layer), Some(guard))
    }
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(file_layer)
    .init();

  guard
}
