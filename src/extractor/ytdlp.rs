use std::{ffi::OsString, path::PathBuf, process::Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::{error::RetrievalError, util::redact_credentials};

use super::{ExtractRequest, Extracted, Extractor};

// run yt-dlp command line to download the media into the request's
// directory. requires yt-dlp executable to be in PATH unless configured.
pub struct Ytdlp {
  program: String,
  proxy: Option<String>,
}

impl Ytdlp {
  pub fn new(program: impl Into<String>, proxy: Option<String>) -> Self {
    Self {
      program: program.into(),
      proxy,
    }
  }

  fn args(&self, request: &ExtractRequest) -> Vec<OsString> {
    let options = &request.options;
    let mut args: Vec<OsString> = vec![
      "-f".into(),
      options.format.as_str().into(),
      "-P".into(),
      request.output_dir.as_os_str().into(),
      "-o".into(),
      options.output_template.as_str().into(),
      "--no-progress".into(),
      // print the final file name once post-processing moved it in place
      "--no-simulate".into(),
      "--print".into(),
      "after_move:filepath".into(),
    ];

    args.push(if options.playlist {
      "--yes-playlist".into()
    } else {
      "--no-playlist".into()
    });
    if !options.warnings {
      args.push("--no-warnings".into());
    }
    args.push(if options.ignore_errors {
      "--ignore-errors".into()
    } else {
      "--abort-on-error".into()
    });

    if let Some(proxy) = &self.proxy {
      args.push("--proxy".into());
      args.push(proxy.into());
    }

    // nothing after this point is parsed as an option
    args.push("--".into());
    args.push(request.url.as_str().into());
    args
  }
}

#[async_trait]
impl Extractor for Ytdlp {
  async fn extract(
    &self,
    request: &ExtractRequest,
  ) -> Result<Extracted, RetrievalError> {
    info!(url = %request.url, "downloading with yt-dlp");
    if let Some(proxy) = &self.proxy {
      debug!(proxy = %redact_credentials(proxy), "using proxy");
    }

    let output = Command::new(&self.program)
      .args(self.args(request))
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      // an aborted retrieval must not leave yt-dlp running
      .kill_on_drop(true)
      .output()
      .await?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    detect_error(&stderr)?;
    if !output.status.success() {
      warn!(status = %output.status, "yt-dlp failed without an error line");
      return Err(RetrievalError::Extraction(format!(
        "yt-dlp exited with {}",
        output.status
      )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .last()
      .map(PathBuf::from)
      .ok_or_else(|| {
        RetrievalError::Extraction("yt-dlp reported no output file".into())
      })?;

    Ok(Extracted { path })
  }
}

fn detect_error(stderr: &str) -> Result<(), RetrievalError> {
  let Some(line) = stderr.lines().find(|line| line.contains("ERROR:")) else {
    return Ok(());
  };

  let message = line.trim().to_string();
  if message.contains("Unsupported URL") {
    Err(RetrievalError::Unsupported(message))
  } else {
    Err(RetrievalError::Extraction(message))
  }
}
