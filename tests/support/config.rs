use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Write `contents` to `config.toml` in a fresh temporary directory.
///
/// The directory is removed when the returned guard is dropped.
pub fn write_temp_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).expect("write temp config");
    (dir, path)
}

/// Config TOML whose database, reports and lock file live under `dir`.
pub fn isolated_config(dir: &Path) -> String {
    format!(
        r#"
database = "{db}"

[report]
dir = "{reports}"

[schedule]
lock_file = "{lock}"

[logging]
level = "warn"
"#,
        db = dir.join("edgescout.db").display(),
        reports = dir.join("reports").display(),
        lock = dir.join("edgescout.lock").display(),
    )
}
