use anyhow::{bail, Context, Result};
use fetchpipe::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fetchpipe=info")),
        )
        .init();

    let manifest_path = std::env::args()
        .nth(1)
        .context("usage: fetchpipe <manifest.json>")?;
    let raw = tokio::fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("cannot read manifest {manifest_path}"))?;
    let manifest: Vec<ManifestEntry> =
        serde_json::from_str(&raw).context("manifest is not a JSON array of entries")?;

    let mut events = Pipeline::new().run(manifest);
    while let Some(event) = events.recv().await {
        match event {
            PipelineEvent::StartCheck => println!("checking local files..."),
            PipelineEvent::Start(count) => println!("downloading {count} file(s)"),
            PipelineEvent::Progress(progress) => {
                if let Some(fraction) = progress.fraction() {
                    print!("\r{} {:.1}%", progress.file_name, fraction * 100.0);
                } else {
                    print!("\r{} {} bytes", progress.file_name, progress.received);
                }
            }
            PipelineEvent::Checking => println!("\nverifying..."),
            PipelineEvent::Next(remaining) => println!("{remaining} file(s) remaining"),
            PipelineEvent::Done => println!("done"),
            PipelineEvent::Error(err) => bail!("download failed: {err}"),
        }
    }
    Ok(())
}
