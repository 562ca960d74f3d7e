use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::PipelineError;

/// Suffix appended to the final file name while a transfer is in flight.
pub const STAGING_SUFFIX: &str = ".part";

/// One resource to materialize locally: a remote url, the directory that
/// will hold the file, and an optional SHA-256 checksum. A missing
/// checksum means presence of the file is sufficient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl ManifestEntry {
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Basename of the url: the segment after the last `/`, with any query
    /// or fragment stripped.
    pub fn file_name(&self) -> Result<&str, PipelineError> {
        let trimmed = self
            .url
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.url);
        let name = trimmed.rsplit('/').next().unwrap_or("");
        if name.is_empty() || name.contains(':') {
            return Err(PipelineError::InvalidUrl(self.url.clone()));
        }
        Ok(name)
    }

    /// Where the verified file ends up: `path/basename(url)`.
    pub fn final_path(&self) -> Result<PathBuf, PipelineError> {
        Ok(self.path.join(self.file_name()?))
    }

    /// Temporary name used while streaming; promoted by atomic rename.
    pub fn staging_path(&self) -> Result<PathBuf, PipelineError> {
        let mut name = self.file_name()?.to_owned();
        name.push_str(STAGING_SUFFIX);
        Ok(self.path.join(name))
    }
}
