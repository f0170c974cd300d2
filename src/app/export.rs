use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::metrics::RunSummary;

/// Write `summary` as pretty JSON to `path`.
pub(crate) async fn export_summary_json(
    path: &Path,
    summary: &RunSummary,
) -> Result<(), std::io::Error> {
    let json = serde_json::to_vec_pretty(summary).map_err(std::io::Error::other)?;
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
