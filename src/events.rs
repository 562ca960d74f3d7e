use tokio::sync::mpsc;

use crate::error::PipelineError;

/// Ordered stream of lifecycle events; the pipeline's only output channel.
pub type EventStream = mpsc::UnboundedReceiver<PipelineEvent>;

/// Snapshot of an in-flight transfer, updated per received chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    pub file_name: String,
    pub received: u64,
    /// Total bytes as reported by Content-Length, when the server sent one.
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Completion as a fraction in 0.0..=1.0, if the total is known.
    pub fn fraction(&self) -> Option<f32> {
        match self.total {
            Some(total) if total > 0 => Some(self.received as f32 / total as f32),
            _ => None,
        }
    }
}

/// Lifecycle events, delivered strictly in order. Events for one entry are
/// fully emitted before the next entry's transfer begins; `Done` and
/// `Error` are terminal.
#[derive(Debug)]
pub enum PipelineEvent {
    /// The pre-download verification pass is starting.
    StartCheck,
    /// Filtering finished; this many entries need a transfer.
    Start(usize),
    /// Bytes arrived for the current entry.
    Progress(TransferProgress),
    /// The current entry finished streaming and is being verified.
    Checking,
    /// The current entry is done; this many entries remain.
    Next(usize),
    /// Every entry is present and verified.
    Done,
    /// The pipeline halted; remaining entries were abandoned.
    Error(PipelineError),
}
