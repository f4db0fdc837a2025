use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PullRequestStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl PullRequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PullRequestStatus::Open => "open",
            PullRequestStatus::Merged => "merged",
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PullRequestStatus {
    type Err = crate::error::SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(PullRequestStatus::Open),
            "merged" => Ok(PullRequestStatus::Merged),
            _ => Err(crate::error::SimError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// DeploymentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Queued,
    Active,
    Failed,
    Stale,
}

impl DeploymentStatus {
    pub fn all() -> &'static [DeploymentStatus] {
        &[
            DeploymentStatus::Queued,
            DeploymentStatus::Active,
            DeploymentStatus::Failed,
            DeploymentStatus::Stale,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::Queued => "queued",
            DeploymentStatus::Active => "active",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Stale => "stale",
        }
    }

    /// `failed` and `stale` accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, DeploymentStatus::Failed | DeploymentStatus::Stale)
    }

    pub fn can_transition_to(self, next: DeploymentStatus) -> bool {
        matches!(
            (self, next),
            (DeploymentStatus::Queued, DeploymentStatus::Active)
                | (DeploymentStatus::Queued, DeploymentStatus::Failed)
                | (DeploymentStatus::Active, DeploymentStatus::Stale)
        )
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeploymentStatus {
    type Err = crate::error::SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(DeploymentStatus::Queued),
            "active" => Ok(DeploymentStatus::Active),
            "failed" => Ok(DeploymentStatus::Failed),
            "stale" => Ok(DeploymentStatus::Stale),
            _ => Err(crate::error::SimError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
