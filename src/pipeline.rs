use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::events::{EventStream, PipelineEvent, TransferProgress};
use crate::filter;
use crate::integrity;
use crate::manifest::ManifestEntry;

/// Drives a manifest one entry at a time: filter out what is already
/// present and valid, then for each remaining entry create the destination
/// directory, stream the resource to its staging path, promote it by atomic
/// rename, and re-verify. One entry is fully resolved before the next
/// begins; the first failure abandons the rest of the queue.
pub struct Pipeline {
    client: Client,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Use a caller-configured HTTP client (proxies, user agent, TLS).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Start the pipeline on the current runtime. The caller observes the
    /// outcome entirely through the returned event stream, which closes
    /// after the terminal `Done` or `Error` event.
    pub fn run(self, manifest: Vec<ManifestEntry>) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            if let Err(err) = self.drive(manifest, &tx).await {
                warn!(error = %err, "pipeline halted");
                let _ = tx.send(PipelineEvent::Error(err));
            }
        });
        rx
    }

    async fn drive(
        &self,
        manifest: Vec<ManifestEntry>,
        tx: &UnboundedSender<PipelineEvent>,
    ) -> Result<(), PipelineError> {
        let _ = tx.send(PipelineEvent::StartCheck);
        let mut pending = filter::select(&manifest).await?;
        if pending.is_empty() {
            info!("all manifest entries already satisfied");
            let _ = tx.send(PipelineEvent::Done);
            return Ok(());
        }
        info!(count = pending.len(), "starting transfers");
        let _ = tx.send(PipelineEvent::Start(pending.len()));

        while let Some(entry) = pending.front().cloned() {
            self.transfer(&entry, tx).await?;

            let _ = tx.send(PipelineEvent::Checking);
            let final_path = entry.final_path()?;
            let verdict = integrity::verify(&final_path, entry.checksum.as_deref()).await?;
            if !verdict.is_valid {
                return Err(PipelineError::ChecksumMismatch(
                    entry.file_name()?.to_owned(),
                ));
            }

            pending.pop_front();
            if pending.is_empty() {
                let _ = tx.send(PipelineEvent::Done);
            } else {
                let _ = tx.send(PipelineEvent::Next(pending.len()));
            }
        }
        Ok(())
    }

    /// Download one entry to its staging path and promote it to the final
    /// name. A partially transferred file is never visible at the final
    /// path; on a failed stream the staging artifact is removed before the
    /// error propagates.
    async fn transfer(
        &self,
        entry: &ManifestEntry,
        tx: &UnboundedSender<PipelineEvent>,
    ) -> Result<(), PipelineError> {
        fs::create_dir_all(&entry.path)
            .await
            .map_err(|e| PipelineError::access(&entry.path, e))?;

        let staging = entry.staging_path()?;
        let final_path = entry.final_path()?;
        info!(url = %entry.url, to = %final_path.display(), "downloading");

        if let Err(err) = self.stream_to(entry, &staging, tx).await {
            let _ = fs::remove_file(&staging).await;
            return Err(err);
        }

        fs::rename(&staging, &final_path)
            .await
            .map_err(|e| PipelineError::access(&final_path, e))?;
        Ok(())
    }

    async fn stream_to(
        &self,
        entry: &ManifestEntry,
        staging: &Path,
        tx: &UnboundedSender<PipelineEvent>,
    ) -> Result<(), PipelineError> {
        let file_name = entry.file_name()?.to_owned();
        let response = self
            .client
            .get(&entry.url)
            .send()
            .await?
            .error_for_status()?;
        let total = response.content_length();

        let mut file = fs::File::create(staging)
            .await
            .map_err(|e| PipelineError::access(staging, e))?;
        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            file.write_all(&bytes)
                .await
                .map_err(|e| PipelineError::access(staging, e))?;
            received += bytes.len() as u64;
            let _ = tx.send(PipelineEvent::Progress(TransferProgress {
                file_name: file_name.clone(),
                received,
                total,
            }));
        }
        file.flush()
            .await
            .map_err(|e| PipelineError::access(staging, e))?;
        debug!(file = %file_name, bytes = received, "stream complete");
        Ok(())
    }
}
