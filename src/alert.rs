//! Spoken alerts.
//!
//! Announcements are fire-and-forget. [`SpeechAlertSink`] hands each
//! utterance to a background task that runs the text-to-speech program
//! one utterance at a time, so the control loop never waits on audio.

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Destination for announcements.
#[cfg_attr(test, mockall::automock)]
pub trait AlertSink: Send + Sync {
    /// Queue `text` to be announced.
    fn announce(&self, text: &str) -> Result<()>;
}

/// Sink that only logs, for boards without audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn announce(&self, text: &str) -> Result<()> {
        info!("[Speak] {}", text);
        Ok(())
    }
}

/// Sink that speaks through an external TTS program such as `espeak`.
pub struct SpeechAlertSink {
    /// Utterance queue.
    tx: mpsc::Sender<String>,
    /// Handle to the speaking task.
    worker: RwLock<Option<tokio::task::JoinHandle<()>>>,
}

impl SpeechAlertSink {
    /// Start the speaking task. Must be called inside a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `program` - TTS executable, invoked with the text as its only argument
    /// * `queue_depth` - utterances that may wait while one is being spoken
    pub fn spawn(program: impl Into<String>, queue_depth: usize) -> Self {
        let program = program.into();
        let (tx, mut rx) = mpsc::channel::<String>(queue_depth.max(1));

        let handle = tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                let status = tokio::process::Command::new(&program)
                    .arg(&text)
                    .kill_on_drop(true)
                    .status()
                    .await;

                match status {
                    Ok(status) if status.success() => debug!("Spoke {:?}", text),
                    Ok(status) => warn!("[TTS] {} exited with {}", program, status),
                    Err(e) => warn!("[TTS] Error: {}", e),
                }
            }
            debug!("Speech worker ended");
        });

        Self {
            tx,
            worker: RwLock::new(Some(handle)),
        }
    }

    /// Stop speaking and drop any queued utterances.
    pub async fn shutdown(&self) {
        let handle = self.worker.write().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl AlertSink for SpeechAlertSink {
    fn announce(&self, text: &str) -> Result<()> {
        self.tx.try_send(text.to_string()).map_err(|e| match e {
            TrySendError::Full(_) => Error::AlertSink {
                reason: "speech queue full".to_string(),
            },
            TrySendError::Closed(_) => Error::AlertSink {
                reason: "speech worker stopped".to_string(),
            },
        })
    }
}
