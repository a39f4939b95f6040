//! Durable destinations for log entries
//!
//! [`LogSink`] is the single shared resource of the logger. Sinks are append-only: an
//! entry that has been accepted is never rewritten or removed.

use super::log_entry::LogEntry;
use crate::error::{HooklogError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Append-only destination for log entries
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Append one entry after every entry appended before it
    async fn append(&self, entry: &LogEntry) -> Result<()>;

    /// Make every accepted entry durable
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Writes entries as JSON Lines, one self-contained object per line
pub struct JsonlFileSink {
    path: PathBuf,
    file: tokio::sync::Mutex<File>,
}

impl JsonlFileSink {
    /// Truncate the file at `path` and append to it from then on
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::create(&path).await?;
        Self::open_append(path).await
    }

    /// Continue an existing log, creating it if missing
    pub async fn open_append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path).await?;
        debug!("Opened event log at {}", path.display());

        Ok(Self {
            path,
            file: tokio::sync::Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSink for JsonlFileSink {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = entry.to_json_line()?;
        line.push('\n');

        // One lock per line keeps concurrent writers from interleaving partial lines
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let file = self.file.lock().await;
        file.sync_data().await?;
        Ok(())
    }
}

/// Writes every entry to several sinks in order
pub struct FanoutSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl LogSink for FanoutSink {
    /// Attempts every sink; reports the first failure after all have been tried
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.append(entry).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.flush().await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

enum QueueMessage {
    Entry(LogEntry),
    Flush(oneshot::Sender<Result<()>>),
}

/// Serializes writes through one writer task draining a queue
///
/// `append` only enqueues, so callers never wait on I/O. Failures of the inner sink
/// surface as warnings from the writer task. Must be created inside a Tokio runtime.
pub struct QueuedSink {
    sender: Mutex<Option<mpsc::UnboundedSender<QueueMessage>>>,
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl QueuedSink {
    pub fn new(inner: Arc<dyn LogSink>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<QueueMessage>();

        let worker = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match message {
                    QueueMessage::Entry(entry) => {
                        if let Err(e) = inner.append(&entry).await {
                            warn!(
                                invocation_id = entry.invocation_id.as_str(),
                                event_type = entry.event_type.as_str(),
                                "Dropped queued log entry: {}",
                                e
                            );
                        }
                    }
                    QueueMessage::Flush(reply) => {
                        let _ = reply.send(inner.flush().await);
                    }
                }
            }
            debug!("Log writer task exiting");
        });

        Self {
            sender: Mutex::new(Some(sender)),
            worker: tokio::sync::Mutex::new(Some(worker)),
        }
    }

    fn send(&self, message: QueueMessage) -> Result<()> {
        let sender = self.sender.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match sender.as_ref() {
            Some(sender) => sender.send(message).map_err(|_| HooklogError::SinkClosed),
            None => Err(HooklogError::SinkClosed),
        }
    }

    /// Stop accepting entries, write everything queued, and wait for the writer task
    pub async fn shutdown(&self) -> Result<()> {
        let sender = self.sender.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take();
        drop(sender);

        if let Some(worker) = self.worker.lock().await.take() {
            worker.await.map_err(|e| HooklogError::SinkError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl LogSink for QueuedSink {
    async fn append(&self, entry: &LogEntry) -> Result<()> {
        self.send(QueueMessage::Entry(entry.clone()))
    }

    /// Waits until every entry queued before this call has been written
    async fn flush(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.send(QueueMessage::Flush(reply))?;
        done.await.map_err(|_| HooklogError::SinkClosed)?
    }
}
