use std::time::Duration;

use crate::error::Result;
use crate::resource::recharge_duration;

/// Sheet configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SheetConfig {
    /// Store category holding attribute records.
    pub attributes_category: String,
    /// Store category holding resource records.
    pub resources_category: String,
    /// Recharge interval in seconds used when content omits one.
    pub default_recharge_interval: f64,
}

impl SheetConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ATTRIBUTES_CATEGORY: &'static str = "attributes";
    pub const DEFAULT_RESOURCES_CATEGORY: &'static str = "resources";
    pub const DEFAULT_RECHARGE_INTERVAL: f64 = 60.0;

    pub fn new() -> Self {
        Self {
            attributes_category: Self::DEFAULT_ATTRIBUTES_CATEGORY.to_owned(),
            resources_category: Self::DEFAULT_RESOURCES_CATEGORY.to_owned(),
            default_recharge_interval: Self::DEFAULT_RECHARGE_INTERVAL,
        }
    }

    pub fn with_recharge_interval(mut self, seconds: f64) -> Self {
        self.default_recharge_interval = seconds;
        self
    }

    /// The default interval as a timer period; fails when it is not a
    /// usable recharge interval.
    pub fn default_recharge_duration(&self) -> Result<Duration> {
        recharge_duration("default_recharge_interval", self.default_recharge_interval)
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new()
    }
}
