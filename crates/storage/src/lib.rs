use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use inboxwatch_core::{ActivationLink, MailResult};

/// Append-only record of successful runs, one `<address>:<url>` line each.
///
/// The file is opened in append mode for every write, so sequential runs and
/// independent processes add lines without truncating what is already there.
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub address: String,
    pub url: String,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, address: &str, link: &ActivationLink) -> MailResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let line = format!("{}:{}\n", address, link.url);
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!(path = %self.path.display(), %address, "activation link saved");
        Ok(())
    }

    /// Records in file order. A missing log is an empty one.
    pub async fn records(&self) -> MailResult<Vec<ResultRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records = raw
            .lines()
            .filter_map(|line| {
                let parsed = line.split_once(':').map(|(address, url)| ResultRecord {
                    address: address.to_string(),
                    url: url.to_string(),
                });
                if parsed.is_none() && !line.trim().is_empty() {
                    debug!(line, "skipping malformed result line");
                }
                parsed
            })
            .collect();

        Ok(records)
    }
}
