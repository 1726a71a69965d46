//! Line-delimited JSON storage for accepted records.
//!
//! One file per site, `{dir}/{site}.jsonl`, one [`AcceptedRecord`] per line.
//! Files are only ever appended to, so repeated runs accumulate records and
//! the aggregator's URL dedup takes care of overlap.

use crate::error::SinkError;
use crate::models::AcceptedRecord;
use crate::utils::truncate_for_log;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

/// `{dir}/{site}.jsonl`
pub fn site_path(dir: impl AsRef<Path>, site: &str) -> PathBuf {
    dir.as_ref().join(format!("{site}.jsonl"))
}

/// Append-only record writer.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    file: fs::File,
    written: usize,
}

impl JsonlSink {
    /// Open `path` for appending, creating it and its parent directory.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SinkError::io(&display, e))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| SinkError::io(&display, e))?;
        info!("Opened record sink");
        Ok(Self {
            path,
            file,
            written: 0,
        })
    }

    pub async fn append(&mut self, record: &AcceptedRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .await
            .map_err(|e| SinkError::io(self.path.display().to_string(), e))?;
        self.written += 1;
        Ok(())
    }

    pub async fn append_all<'r, I>(&mut self, records: I) -> Result<(), SinkError>
    where
        I: IntoIterator<Item = &'r AcceptedRecord>,
    {
        for record in records {
            self.append(record).await?;
        }
        Ok(())
    }

    /// Flush buffered bytes and report how many records this sink wrote.
    pub async fn finish(mut self) -> Result<usize, SinkError> {
        self.file
            .flush()
            .await
            .map_err(|e| SinkError::io(self.path.display().to_string(), e))?;
        info!(path = %self.path.display(), written = self.written, "Closed record sink");
        Ok(self.written)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

/// Read every well-formed record from `path`.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn read_records(path: impl AsRef<Path>) -> Result<Vec<AcceptedRecord>, SinkError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| SinkError::io(path.display().to_string(), e))?;
    let records = parse_records(&text);
    info!(count = records.len(), "Read records");
    Ok(records)
}

/// Parse JSONL text, skipping blank lines and warning on malformed ones.
pub fn parse_records(text: &str) -> Vec<AcceptedRecord> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match serde_json::from_str::<AcceptedRecord>(line) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    line = i + 1,
                    error = %e,
                    preview = %truncate_for_log(line, 120),
                    "Skipping malformed record"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(url: &str) -> AcceptedRecord {
        let published = NaiveDate::from_ymd_opt(2020, 3, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        AcceptedRecord {
            date: "2020-03-15".to_string(),
            url: url.to_string(),
            title: "Covid-19".to_string(),
            keywords: String::new(),
            description: String::new(),
            published_datetime: published,
        }
    }

    #[test]
    fn test_site_path() {
        assert_eq!(site_path("data", "24h"), PathBuf::from("data/24h.jsonl"));
    }

    #[tokio::test]
    async fn test_append_never_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = site_path(dir.path().join("nested"), "vtv");

        let mut sink = JsonlSink::open(&path).await.unwrap();
        sink.append(&record("a")).await.unwrap();
        assert_eq!(sink.finish().await.unwrap(), 1);

        let mut sink = JsonlSink::open(&path).await.unwrap();
        sink.append_all(&[record("b"), record("a")]).await.unwrap();
        assert_eq!(sink.written(), 2);
        sink.finish().await.unwrap();

        let records = read_records(&path).await.unwrap();
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["a", "b", "a"]);
        assert_eq!(records[0], record("a"));
    }

    #[test]
    fn test_parse_skips_blank_and_malformed_lines() {
        let text = concat!(
            r#"{"date":"2020-03-15","url":"a","title":"t","keywords":"","description":"","published_datetime":"2020-03-15T08:00:00"}"#,
            "\n\n",
            "{not json\n",
            r#"{"date": "2020-03-16", "url": "b", "title": "t", "keywords": "", "description": "", "published_datetime": "2020-03-16 09:15:00"}"#,
            "\n",
        );
        let records = parse_records(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].url, "b");
        assert_eq!(records[1].published_datetime.to_string(), "2020-03-16 09:15:00");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(dir.path().join("none.jsonl")).await.unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
