use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::Target;

pub const DEFAULT_TARGETS: &[&str] = &[
    "https://www.easyjet.com/",
    "https://www.skyscanner.de/",
    "https://www.ryanair.com",
    "https://wizzair.com/",
    "https://www.swiss.com/",
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DispatchConfig {
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_settle_wait")]
    pub settle_wait_ms: u64,
}

fn default_probe_timeout() -> u64 { 10_000 }
fn default_settle_wait() -> u64 { 5_000 }

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout(),
            settle_wait_ms: default_settle_wait(),
        }
    }
}

impl DispatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Fixed pause used by the fire-and-forget strategy.
    pub fn settle_wait(&self) -> Duration {
        Duration::from_millis(self.settle_wait_ms)
    }
}

pub fn default_targets() -> Vec<Target> {
    DEFAULT_TARGETS.iter().map(|&u| Target::from(u)).collect()
}
