//! Writes aggregated daily series for an external charting step.

use crate::error::SinkError;
use crate::models::DailySeries;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `series` as pretty JSON to `path`, replacing any previous file.
#[instrument(level = "info", skip_all, fields(site = %series.site, path = %path.as_ref().display()))]
pub async fn write_series(series: &DailySeries, path: impl AsRef<Path>) -> Result<(), SinkError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(series)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SinkError::io(parent.display().to_string(), e))?;
    }
    fs::write(path, json)
        .await
        .map_err(|e| SinkError::io(path.display().to_string(), e))?;
    info!(days = series.len(), total = series.total(), "Wrote daily series");
    Ok(())
}

pub async fn read_series(path: impl AsRef<Path>) -> Result<DailySeries, SinkError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| SinkError::io(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&text)?)
}
