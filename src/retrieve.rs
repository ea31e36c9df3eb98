use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use tempfile::TempDir;
use tracing::{info, warn};

use crate::{
  error::RetrievalError,
  extractor::{ExtractOptions, ExtractRequest, Extractor},
};

const SCRATCH_PREFIX: &str = "dl-";

/// A downloaded media file. Dropping it deletes the file together with its
/// scratch directory.
#[derive(Debug)]
pub struct Artifact {
  path: PathBuf,
  size_bytes: u64,
  // declared last so it is dropped after the file is gone
  _scratch: TempDir,
}

impl Artifact {
  pub(crate) fn new(path: PathBuf, size_bytes: u64, scratch: TempDir) -> Self {
    Self {
      path,
      size_bytes,
      _scratch: scratch,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn size_bytes(&self) -> u64 {
    self.size_bytes
  }

  pub fn file_name(&self) -> String {
    self
      .path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| String::from("video"))
  }
}

impl Drop for Artifact {
  fn drop(&mut self) {
    // delete the file on drop
    if let Err(e) = std::fs::remove_file(&self.path) {
      warn!("failed to delete file {}: {}", self.path.display(), e);
    } else {
      info!("deleted file: {}", self.path.display());
    }
  }
}

#[derive(Clone)]
pub struct Retriever {
  extractor: Arc<dyn Extractor>,
  download_dir: PathBuf,
  timeout: Duration,
}

impl Retriever {
  pub fn new(
    extractor: Arc<dyn Extractor>,
    download_dir: impl Into<PathBuf>,
    timeout: Duration,
  ) -> Self {
    Self {
      extractor,
      download_dir: download_dir.into(),
      timeout,
    }
  }

  // one attempt, no retries. every failure leaves nothing on disk.
  pub async fn retrieve(&self, url: &str) -> Result<Artifact, RetrievalError> {
    // one directory per retrieval, so equal file names never collide
    let scratch = tempfile::Builder::new()
      .prefix(SCRATCH_PREFIX)
      .tempdir_in(&self.download_dir)?;
    let request = ExtractRequest {
      url: url.to_string(),
      output_dir: scratch.path().to_owned(),
      options: ExtractOptions::default(),
    };

    // extraction runs on its own task, only this handler waits for it
    let extractor = self.extractor.clone();
    let mut task =
      tokio::spawn(async move { extractor.extract(&request).await });

    let extracted = match tokio::time::timeout(self.timeout, &mut task).await {
      Ok(Ok(res)) => res?,
      Ok(Err(e)) => return Err(RetrievalError::Aborted(e.to_string())),
      Err(_) => {
        task.abort();
        // yt-dlp is killed when the task's future is dropped; wait for that
        // before the scratch directory goes away
        let _ = task.await;
        return Err(RetrievalError::TimedOut(self.timeout));
      }
    };

    // the extractor's word is not enough, the file has to be there
    let metadata = match tokio::fs::metadata(&extracted.path).await {
      Ok(metadata) if metadata.is_file() => metadata,
      _ => return Err(RetrievalError::MissingOutput(extracted.path)),
    };

    info!(
      url,
      path = %extracted.path.display(),
      size = metadata.len(),
      "retrieved video"
    );
    Ok(Artifact::new(extracted.path, metadata.len(), scratch))
  }
}
