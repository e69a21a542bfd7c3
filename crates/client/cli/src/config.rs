//! CLI configuration from environment variables.
//!
//! | variable            | default                       |
//! |---------------------|-------------------------------|
//! | `SHEET_CONTENT_DIR` | `./content`                   |
//! | `SHEET_DATA_DIR`    | platform data dir             |
//! | `SHEET_OWNER`       | `1`                           |
//! | `SHEET_SESSION`     | `session_<unix seconds>`      |
//!
//! Command line flags override the environment.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::dirs;

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub content_dir: PathBuf,
    pub data_dir: PathBuf,
    pub owner: u64,
    pub session_id: String,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        let content_dir = std::env::var_os("SHEET_CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("content"));
        let data_dir = std::env::var_os("SHEET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(dirs::data_dir);
        let owner = match std::env::var("SHEET_OWNER") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("SHEET_OWNER must be an integer, got {raw:?}"))?,
            Err(_) => 1,
        };
        let session_id = std::env::var("SHEET_SESSION").unwrap_or_else(|_| {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            format!("session_{timestamp}")
        });

        Ok(Self {
            content_dir,
            data_dir,
            owner,
            session_id,
        })
    }
}
