use crate::claims::GroupingLimits;
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "pipesim.yaml";
pub const DEFAULT_WEBHOOK_URL: &str = "http://host.docker.internal:8000/webhooks";

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Explicit identity pool. Empty means "generate one".
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Deployment completion webhook. `null` or blank turns notifications off.
    #[serde(default = "default_webhook_url")]
    pub webhook_url: Option<String>,
    #[serde(default = "default_notify_timeout_ms")]
    pub notify_timeout_ms: u64,
    #[serde(default = "default_max_commits")]
    pub max_commits_per_tick: u32,
    #[serde(default = "default_max_batches")]
    pub max_pull_request_batches: u32,
    #[serde(default = "default_max_group_size")]
    pub max_commits_per_pull_request: u32,
    #[serde(default = "default_max_issues")]
    pub max_issues_per_tick: u32,
    #[serde(default = "default_unassigned_percent")]
    pub unassigned_issue_percent: u8,
    #[serde(default = "default_success_percent")]
    pub deployment_success_percent: u8,
    #[serde(default = "default_time_activity_percent")]
    pub time_activity_percent: u8,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval_ms() -> u64 {
    5_000
}

fn default_webhook_url() -> Option<String> {
    Some(DEFAULT_WEBHOOK_URL.to_string())
}

fn default_notify_timeout_ms() -> u64 {
    2_000
}

fn default_max_commits() -> u32 {
    10
}

fn default_max_batches() -> u32 {
    4
}

fn default_max_group_size() -> u32 {
    3
}

fn default_max_issues() -> u32 {
    10
}

fn default_unassigned_percent() -> u8 {
    30
}

fn default_success_percent() -> u8 {
    90
}

fn default_time_activity_percent() -> u8 {
    18
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            tick_interval_ms: default_tick_interval_ms(),
            webhook_url: default_webhook_url(),
            notify_timeout_ms: default_notify_timeout_ms(),
            max_commits_per_tick: default_max_commits(),
            max_pull_request_batches: default_max_batches(),
            max_commits_per_pull_request: default_max_group_size(),
            max_issues_per_tick: default_max_issues(),
            unassigned_issue_percent: default_unassigned_percent(),
            deployment_success_percent: default_success_percent(),
            time_activity_percent: default_time_activity_percent(),
            seed: None,
        }
    }
}

impl SimConfig {
    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_yaml::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::replace_file(path, self.to_yaml()?.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Derived settings
    // ---------------------------------------------------------------------------

    pub fn validate(&self) -> Result<()> {
        let percents = [
            ("unassigned_issue_percent", self.unassigned_issue_percent),
            ("deployment_success_percent", self.deployment_success_percent),
            ("time_activity_percent", self.time_activity_percent),
        ];
        for (name, value) in percents {
            if value > 100 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be at most 100, got {value}"
                )));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(SimError::InvalidConfig(
                "tick_interval_ms must be positive".into(),
            ));
        }
        if self.max_commits_per_pull_request == 0 {
            return Err(SimError::InvalidConfig(
                "max_commits_per_pull_request must be positive".into(),
            ));
        }
        if !self.users.is_empty() && self.users.iter().all(|u| u.trim().is_empty()) {
            return Err(SimError::InvalidConfig(
                "users must contain at least one non-blank name".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }

    pub fn grouping_limits(&self) -> GroupingLimits {
        GroupingLimits {
            max_batches: self.max_pull_request_batches,
            max_group_size: self.max_commits_per_pull_request,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
