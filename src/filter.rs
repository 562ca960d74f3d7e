use std::collections::VecDeque;
use tracing::debug;

use crate::error::PipelineError;
use crate::integrity;
use crate::manifest::ManifestEntry;

/// Reduce a manifest to the entries that actually need a transfer, in the
/// original order. An entry is skipped only when its final path exists and
/// passes verification; existence alone is enough when no checksum is set.
/// This is the sole place existence and correctness are decided.
pub async fn select(manifest: &[ManifestEntry]) -> Result<VecDeque<ManifestEntry>, PipelineError> {
    let mut pending = VecDeque::new();
    for entry in manifest {
        let final_path = entry.final_path()?;
        if !final_path.exists() {
            debug!(path = %final_path.display(), "not on disk, queueing");
            pending.push_back(entry.clone());
            continue;
        }
        let verdict = integrity::verify(&final_path, entry.checksum.as_deref()).await?;
        if verdict.is_valid {
            debug!(path = %final_path.display(), "already valid, skipping");
        } else {
            debug!(path = %final_path.display(), "checksum mismatch, queueing");
            pending.push_back(entry.clone());
        }
    }
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn entry(dir: &std::path::Path, name: &str, checksum: Option<&str>) -> ManifestEntry {
        let entry = ManifestEntry::new(format!("http://host/{name}"), dir);
        match checksum {
            Some(sum) => entry.with_checksum(sum),
            None => entry,
        }
    }

    #[tokio::test]
    async fn missing_file_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = vec![entry(dir.path(), "a.bin", Some(HELLO_SHA256))];
        let pending = select(&manifest).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn valid_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.bin"), b"hello")
            .await
            .unwrap();
        let manifest = vec![entry(dir.path(), "a.bin", Some(HELLO_SHA256))];
        let pending = select(&manifest).await.unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.bin"), b"wrong")
            .await
            .unwrap();
        let manifest = vec![entry(dir.path(), "a.bin", Some(HELLO_SHA256))];
        let pending = select(&manifest).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn existing_file_without_checksum_is_valid_whatever_it_holds() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.bin"), b"garbage")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("b.bin"), b"").await.unwrap();
        let manifest = vec![
            entry(dir.path(), "a.bin", None),
            entry(dir.path(), "b.bin", None),
        ];
        let pending = select(&manifest).await.unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn selection_preserves_manifest_order() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("b.bin"), b"hello")
            .await
            .unwrap();
        let manifest = vec![
            entry(dir.path(), "a.bin", None),
            entry(dir.path(), "b.bin", Some(HELLO_SHA256)),
            entry(dir.path(), "c.bin", None),
        ];
        let pending = select(&manifest).await.unwrap();
        let names: Vec<_> = pending.iter().map(|e| e.file_name().unwrap()).collect();
        assert_eq!(names, ["a.bin", "c.bin"]);
    }
}
