//! Platform-specific directory utilities
//!
//! - logs: `~/.cache/sheet/logs` on Linux, `~/Library/Caches/sheet/logs` on macOS
//! - data: `~/.local/share/sheet` on Linux, `~/Library/Application Support/sheet` on macOS

use std::path::PathBuf;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "sheet")
}

/// Directory holding one sub-directory of logs per session.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/sheet"))
        .join("logs")
}

/// Default root for the JSON attribute store.
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}
