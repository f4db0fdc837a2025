//! Integrity index: which commits belong to a pull request and which pull
//! requests belong to a deployment. Everything that hands out commits or
//! pull requests goes through here, so nothing is ever claimed twice.

use crate::commit::Commit;
use crate::deployment::Deployment;
use crate::factory::EntityFactory;
use crate::pull_request::PullRequest;
use crate::random::RandomSource;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ClaimIndex {
    commits: HashSet<String>,
    pull_requests: HashSet<String>,
}

impl ClaimIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_commit_claimed(&self, sha: &str) -> bool {
        self.commits.contains(sha)
    }

    pub fn is_pull_request_deployed(&self, id: &str) -> bool {
        self.pull_requests.contains(id)
    }

    /// Unclaimed commits in generation order.
    pub fn unclaimed_commits<'a>(
        &self,
        commits: impl IntoIterator<Item = &'a Commit>,
    ) -> Vec<String> {
        commits
            .into_iter()
            .filter(|c| !self.commits.contains(&c.sha))
            .map(|c| c.sha.clone())
            .collect()
    }

    /// Record `pr`'s commits as claimed. Returns `false` if any was taken.
    pub fn claim_commits(&mut self, pr: &PullRequest) -> bool {
        if pr.commits.iter().any(|sha| self.commits.contains(sha)) {
            return false;
        }
        self.commits.extend(pr.commits.iter().cloned());
        true
    }

    pub fn claimed_commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn deployed_pull_request_count(&self) -> usize {
        self.pull_requests.len()
    }
}

/// Limits for one grouping pass.
#[derive(Debug, Clone, Copy)]
pub struct GroupingLimits {
    /// Upper bound of the random number of groups attempted.
    pub max_batches: u32,
    /// Upper bound of the random group size (lower bound is 1).
    pub max_group_size: u32,
}

// ---------------------------------------------------------------------------
// PR grouping
// ---------------------------------------------------------------------------

/// Group unclaimed commits into new open pull requests.
///
/// Pops from the tail of the unclaimed pool, so the most recent commits are
/// grouped first. Stops at the first group the pool can't fill; never forms a
/// partial group. The caller claims the commits when inserting the result.
pub fn group_into_pull_requests<'a>(
    index: &ClaimIndex,
    commits: impl IntoIterator<Item = &'a Commit>,
    limits: GroupingLimits,
    factory: &EntityFactory<'_>,
    rng: &mut dyn RandomSource,
) -> Vec<PullRequest> {
    let mut pool = index.unclaimed_commits(commits);
    let attempts = rng.range(0, u64::from(limits.max_batches));
    let mut prs = Vec::new();
    for _ in 0..attempts {
        let size = rng.range(1, u64::from(limits.max_group_size.max(1))) as usize;
        if pool.len() < size {
            break;
        }
        let mut group = Vec::with_capacity(size);
        for _ in 0..size {
            if let Some(sha) = pool.pop() {
                group.push(sha);
            }
        }
        prs.push(factory.new_pull_request(rng, group));
    }
    prs
}

// ---------------------------------------------------------------------------
// Deployment assembly
// ---------------------------------------------------------------------------

/// Bundle one or two merged, undeployed pull requests into a queued
/// deployment, claiming them in `index`.
///
/// Produces nothing unless at least two candidates exist.
pub fn assemble_deployment<'a>(
    prs: impl IntoIterator<Item = &'a PullRequest>,
    index: &mut ClaimIndex,
    factory: &EntityFactory<'_>,
    rng: &mut dyn RandomSource,
) -> Option<Deployment> {
    let candidates: Vec<&PullRequest> = prs
        .into_iter()
        .filter(|pr| pr.is_merged() && !index.pull_requests.contains(&pr.id))
        .collect();
    if candidates.len() < 2 {
        return None;
    }

    let amount = rng.range(1, 2) as usize;
    let mut picks = rng.sample_indices(candidates.len(), amount);
    // Keep pull request order stable in the deployment record.
    picks.sort_unstable();
    let selected: Vec<&PullRequest> = picks.into_iter().map(|i| candidates[i]).collect();

    let pr_ids: Vec<String> = selected.iter().map(|pr| pr.id.clone()).collect();
    let commits: Vec<String> = selected
        .iter()
        .flat_map(|pr| pr.commits.iter().cloned())
        .collect();

    index.pull_requests.extend(pr_ids.iter().cloned());
    let deployment = factory.new_deployment(rng, pr_ids, commits);
    tracing::info!(
        deployment = %deployment.id,
        pull_requests = deployment.pull_requests.len(),
        commits = deployment.commits.len(),
        "deployment queued"
    );
    Some(deployment)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
