//! Scheduling and output locations.

use serde::Deserialize;

/// `[schedule]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Hours between scheduled runs (default: 6).
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
    /// Lock file held while the scheduler is running.
    #[serde(default = "default_lock_file")]
    pub lock_file: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
            lock_file: default_lock_file(),
        }
    }
}

const fn default_interval_hours() -> u64 {
    6
}

fn default_lock_file() -> String {
    "data/edgescout.lock".into()
}

/// `[report]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving one text report per run.
    #[serde(default = "default_report_dir")]
    pub dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
        }
    }
}

fn default_report_dir() -> String {
    "reports".into()
}
