use crate::random::RandomSource;
use crate::registry::{Keyed, Registry};
use crate::types::PullRequestStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub title: String,
    pub status: PullRequestStatus,
    /// Commit shas, never empty, disjoint from every other pull request's.
    pub commits: Vec<String>,
}

impl PullRequest {
    pub fn is_open(&self) -> bool {
        self.status == PullRequestStatus::Open
    }

    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }
}

impl Keyed for PullRequest {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Merge transition
// ---------------------------------------------------------------------------

/// Merge a random subset (possibly empty, possibly all) of the open pull
/// requests. Returns the ids merged, in the order they were picked.
pub fn close_pull_requests(
    prs: &mut Registry<PullRequest>,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    let open: Vec<usize> = prs
        .iter()
        .enumerate()
        .filter(|(_, pr)| pr.is_open())
        .map(|(i, _)| i)
        .collect();
    let count = rng.range(0, open.len() as u64) as usize;

    let mut merged = Vec::with_capacity(count);
    for pick in rng.sample_indices(open.len(), count) {
        let Some(pr) = prs.get_index_mut(open[pick]) else {
            continue;
        };
        pr.status = PullRequestStatus::Merged;
        tracing::info!(pull_request = %pr.id, title = %pr.title, "pull request merged");
        merged.push(pr.id.clone());
    }
    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
