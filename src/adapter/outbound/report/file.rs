//! Plain-text report files.
//!
//! One file per run, named after the run timestamp. Files are created with
//! `create_new`, so an existing report is never overwritten; a colliding
//! name gets a numeric suffix instead.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::application::report::render_text;
use crate::domain::report::RunReport;
use crate::error::{Error, Result};
use crate::port::{PersistedReport, ReportStore};

/// Suffixes tried after the bare name is taken.
const MAX_SUFFIX: u32 = 99;

/// Writes each report as a text file under a directory.
#[derive(Debug, Clone)]
pub struct FileReportStore {
    dir: PathBuf,
}

impl FileReportStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(report: &RunReport, suffix: u32) -> String {
        let stamp = report.run_at.format("%Y%m%d_%H%M%S");
        if suffix == 0 {
            format!("opportunity_report_{stamp}.txt")
        } else {
            format!("opportunity_report_{stamp}_{suffix}.txt")
        }
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn persist(&self, report: &RunReport) -> Result<PersistedReport> {
        fs::create_dir_all(&self.dir).await?;
        let text = render_text(report);

        for suffix in 0..=MAX_SUFFIX {
            let path = self.dir.join(Self::file_name(report, suffix));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(text.as_bytes()).await?;
            file.flush().await?;

            let location = path.display().to_string();
            info!(path = %location, "Report written");
            return Ok(PersistedReport { location });
        }

        Err(Error::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!(
                "no free report file name for {} in {}",
                report.run_at,
                self.dir.display()
            ),
        )))
    }
}
