use crate::error::{Result, SimError};
use crate::random::RandomSource;
use crate::registry::{Keyed, Registry};
use crate::types::DeploymentStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    /// Union of the commits of `pull_requests`, in pull request order.
    pub commits: Vec<String>,
    pub pull_requests: Vec<String>,
    pub status: DeploymentStatus,
}

impl Deployment {
    pub fn transition(&mut self, next: DeploymentStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(SimError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

impl Keyed for Deployment {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }
}

/// Payload sent to the webhook when a deployment completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentNotice {
    pub deployment: Deployment,
    /// Synthetic diagnostic text.
    pub stacktrace: String,
}

// ---------------------------------------------------------------------------
// Completion transition
// ---------------------------------------------------------------------------

/// Resolve one queued deployment to `active` or `failed`.
///
/// On success every other `active` deployment goes `stale`. Returns `None`
/// when nothing is queued. Must only be called while no incident is open.
pub fn complete_deployments(
    deployments: &mut Registry<Deployment>,
    rng: &mut dyn RandomSource,
    success_percent: u8,
) -> Result<Option<DeploymentNotice>> {
    let queued: Vec<usize> = deployments
        .iter()
        .enumerate()
        .filter(|(_, d)| d.status == DeploymentStatus::Queued)
        .map(|(i, _)| i)
        .collect();
    let Some(pick) = rng.pick_index(queued.len()) else {
        return Ok(None);
    };
    let chosen = queued[pick];

    let outcome = if rng.chance(success_percent) {
        DeploymentStatus::Active
    } else {
        DeploymentStatus::Failed
    };
    if let Some(d) = deployments.get_index_mut(chosen) {
        d.transition(outcome)?;
    }

    if outcome == DeploymentStatus::Active {
        tracing::info!(deployment = %deployments[chosen].id, "deployment succeeded");
        for (i, other) in deployments.iter_mut().enumerate() {
            if i != chosen && other.status == DeploymentStatus::Active {
                other.transition(DeploymentStatus::Stale)?;
                tracing::debug!(deployment = %other.id, "deployment superseded");
            }
        }
    } else {
        tracing::info!(deployment = %deployments[chosen].id, "deployment failed");
    }

    Ok(Some(DeploymentNotice {
        deployment: deployments[chosen].clone(),
        stacktrace: rng.paragraph(),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
