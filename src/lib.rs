pub mod error;
pub mod events;
pub mod filter;
pub mod integrity;
pub mod manifest;
pub mod pipeline;

/// Convenient re-exports of the common types.
pub mod prelude {
    pub use crate::error::PipelineError;
    pub use crate::events::{EventStream, PipelineEvent, TransferProgress};
    pub use crate::manifest::ManifestEntry;
    pub use crate::pipeline::Pipeline;
}
