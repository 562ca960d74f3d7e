use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a digest check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub is_valid: bool,
    /// The digest actually computed; `None` when no checksum was expected
    /// and the file was not read.
    pub computed: Option<String>,
}

/// Compute the SHA-256 hash of a file, lowercase hex.
pub async fn sha256_sum(path: &Path) -> Result<String, IntegrityError> {
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 1024 * 8];
    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare a file against an expected SHA-256 digest. No expected digest
/// means verification is skipped and the file counts as valid, by policy.
/// An unreadable file is an error, not an invalid verdict.
pub async fn verify(path: &Path, expected: Option<&str>) -> Result<Verification, IntegrityError> {
    let Some(expected) = expected else {
        return Ok(Verification {
            is_valid: true,
            computed: None,
        });
    };
    let computed = sha256_sum(path).await?;
    Ok(Verification {
        is_valid: computed == expected,
        computed: Some(computed),
    })
}
