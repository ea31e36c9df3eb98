// test doubles for the external collaborators

use std::{
  path::{Path, PathBuf},
  sync::{
    atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering},
    Mutex,
  },
  time::Duration,
};

use async_trait::async_trait;

use crate::{
  error::{RetrievalError, SourceError, TransportError},
  extractor::{ExtractRequest, Extracted, Extractor},
  source::{Candidate, Source},
  transport::{Button, ChatId, ChatTransport, MessageRef},
};

pub struct StaticSource {
  candidates: Option<Vec<Candidate>>,
  queries: Mutex<Vec<String>>,
}

impl StaticSource {
  pub fn new(candidates: Vec<Candidate>) -> Self {
    Self {
      candidates: Some(candidates),
      queries: Mutex::default(),
    }
  }

  pub fn failing() -> Self {
    Self {
      candidates: None,
      queries: Mutex::default(),
    }
  }

  pub fn queries(&self) -> Vec<String> {
    self.queries.lock().unwrap().clone()
  }
}

#[async_trait]
impl Source for StaticSource {
  fn name(&self) -> &'static str {
    "static"
  }

  async fn search(&self, query: &str) -> Result<Vec<Candidate>, SourceError> {
    self.queries.lock().unwrap().push(query.to_string());
    self
      .candidates
      .clone()
      .ok_or(SourceError::InvalidHTML("static"))
  }
}

enum Script {
  // creates a (sparse) file of the given size
  Writes(u64),
  Unsupported,
  ClaimsOnly,
  Hangs,
}

pub struct FakeExtractor {
  script: Script,
  calls: AtomicUsize,
  cancelled: AtomicBool,
}

// flags the extraction as cancelled unless disarmed
struct CancelGuard<'a>(Option<&'a AtomicBool>);

impl Drop for CancelGuard<'_> {
  fn drop(&mut self) {
    if let Some(flag) = self.0 {
      flag.store(true, Ordering::SeqCst);
    }
  }
}

impl FakeExtractor {
  fn new(script: Script) -> Self {
    Self {
      script,
      calls: AtomicUsize::new(0),
      cancelled: AtomicBool::new(false),
    }
  }

  pub fn writes(size: u64) -> Self {
    Self::new(Script::Writes(size))
  }

  pub fn unsupported() -> Self {
    Self::new(Script::Unsupported)
  }

  pub fn claims_only() -> Self {
    Self::new(Script::ClaimsOnly)
  }

  pub fn hangs() -> Self {
    Self::new(Script::Hangs)
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  // whether an extraction was dropped before it finished
  pub fn cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Extractor for FakeExtractor {
  async fn extract(
    &self,
    request: &ExtractRequest,
  ) -> Result<Extracted, RetrievalError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let path = request.output_dir.join("video.mp4");

    match self.script {
      Script::Writes(size) => {
        let file = tokio::fs::File::create(&path).await?;
        file.set_len(size).await?;
        Ok(Extracted { path })
      }
      Script::Unsupported => Err(RetrievalError::Unsupported(format!(
        "ERROR: Unsupported URL: {}",
        request.url
      ))),
      Script::ClaimsOnly => Ok(Extracted { path }),
      Script::Hangs => {
        let mut guard = CancelGuard(Some(&self.cancelled));
        tokio::fs::write(request.output_dir.join("video.mp4.part"), b"partial")
          .await?;
        tokio::time::sleep(Duration::from_secs(3600)).await;
        guard.0 = None;
        Ok(Extracted { path })
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Text {
    chat: ChatId,
    text: String,
    buttons: Vec<Button>,
  },
  Media {
    chat: ChatId,
    path: PathBuf,
    caption: String,
    file_existed: bool,
  },
  Document {
    chat: ChatId,
    path: PathBuf,
    filename: String,
    file_existed: bool,
  },
  Edit {
    message: MessageRef,
    text: String,
  },
  ClearButtons(MessageRef),
  Delete(MessageRef),
  Ack(String),
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub enum UploadBehavior {
  #[default]
  Succeed,
  Fail,
  Panic,
}

#[derive(Default)]
pub struct RecordingTransport {
  calls: Mutex<Vec<Call>>,
  next_id: AtomicI32,
  uploads: UploadBehavior,
  // send_text fails for texts containing this
  failing_text: Option<String>,
}

pub const REMOTE_FILE_ID: &str = "BQACAgIAAxkBAAIB";

impl RecordingTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_uploads(uploads: UploadBehavior) -> Self {
    Self {
      uploads,
      ..Self::default()
    }
  }

  pub fn failing_text(needle: &str) -> Self {
    Self {
      failing_text: Some(needle.to_string()),
      ..Self::default()
    }
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn texts(&self) -> Vec<String> {
    self
      .calls()
      .into_iter()
      .filter_map(|call| match call {
        Call::Text { text, .. } | Call::Edit { text, .. } => Some(text),
        _ => None,
      })
      .collect()
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }

  fn message(&self, chat: ChatId) -> MessageRef {
    MessageRef {
      chat,
      id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
    }
  }

  fn upload(&self, method: &'static str) -> Result<(), TransportError> {
    match self.uploads {
      UploadBehavior::Succeed => Ok(()),
      UploadBehavior::Fail => Err(TransportError::Api {
        method,
        description: "Request Entity Too Large".into(),
      }),
      UploadBehavior::Panic => panic!("connection reset during {method}"),
    }
  }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
  async fn send_text(
    &self,
    chat: ChatId,
    text: &str,
    buttons: &[Button],
  ) -> Result<MessageRef, TransportError> {
    if let Some(needle) = &self.failing_text {
      if text.contains(needle.as_str()) {
        return Err(TransportError::Api {
          method: "sendMessage",
          description: "Bad Request".into(),
        });
      }
    }

    self.record(Call::Text {
      chat,
      text: text.to_string(),
      buttons: buttons.to_vec(),
    });
    Ok(self.message(chat))
  }

  async fn send_media(
    &self,
    chat: ChatId,
    file: &Path,
    caption: &str,
  ) -> Result<MessageRef, TransportError> {
    self.record(Call::Media {
      chat,
      path: file.to_owned(),
      caption: caption.to_string(),
      file_existed: file.exists(),
    });
    self.upload("sendVideo")?;
    Ok(self.message(chat))
  }

  async fn send_document(
    &self,
    chat: ChatId,
    file: &Path,
    filename: &str,
  ) -> Result<String, TransportError> {
    self.record(Call::Document {
      chat,
      path: file.to_owned(),
      filename: filename.to_string(),
      file_existed: file.exists(),
    });
    self.upload("sendDocument")?;
    Ok(REMOTE_FILE_ID.to_string())
  }

  async fn edit_text(
    &self,
    message: MessageRef,
    text: &str,
  ) -> Result<(), TransportError> {
    self.record(Call::Edit {
      message,
      text: text.to_string(),
    });
    Ok(())
  }

  async fn clear_buttons(
    &self,
    message: MessageRef,
  ) -> Result<(), TransportError> {
    self.record(Call::ClearButtons(message));
    Ok(())
  }

  async fn delete_message(
    &self,
    message: MessageRef,
  ) -> Result<(), TransportError> {
    self.record(Call::Delete(message));
    Ok(())
  }

  async fn acknowledge(&self, action_id: &str) -> Result<(), TransportError> {
    self.record(Call::Ack(action_id.to_string()));
    Ok(())
  }
}
