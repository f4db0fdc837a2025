//! Builders for freshly generated entities. Nothing here claims or stores.

use crate::commit::Commit;
use crate::deployment::Deployment;
use crate::issue::Issue;
use crate::pull_request::PullRequest;
use crate::random::RandomSource;
use crate::time_entry::TimeEntry;
use crate::types::{DeploymentStatus, PullRequestStatus};
use crate::users::UserPool;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

/// How far back a new time entry may start.
const MAX_ENTRY_AGE_SECS: u64 = 30 * 24 * 60 * 60;

const MAX_ISSUE_NUMBER: u64 = 9_999;

pub struct EntityFactory<'a> {
    users: &'a UserPool,
    unassigned_issue_percent: u8,
}

impl<'a> EntityFactory<'a> {
    pub fn new(users: &'a UserPool, unassigned_issue_percent: u8) -> Self {
        Self {
            users,
            unassigned_issue_percent,
        }
    }

    pub fn new_commit(&self, rng: &mut dyn RandomSource) -> Commit {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Commit {
            sha: format!("{:x}", Sha256::digest(seed)),
            author: self.users.pick(rng).to_string(),
        }
    }

    pub fn new_pull_request(&self, rng: &mut dyn RandomSource, commits: Vec<String>) -> PullRequest {
        PullRequest {
            id: random_uuid(rng),
            title: rng.sentence(),
            status: PullRequestStatus::Open,
            commits,
        }
    }

    pub fn new_deployment(
        &self,
        rng: &mut dyn RandomSource,
        pull_requests: Vec<String>,
        commits: Vec<String>,
    ) -> Deployment {
        Deployment {
            id: random_uuid(rng),
            commits,
            pull_requests,
            status: DeploymentStatus::Queued,
        }
    }

    /// `id` comes from the store; the factory never allocates ids itself.
    pub fn new_issue(&self, rng: &mut dyn RandomSource, id: u64) -> Issue {
        let number = rng.range(0, MAX_ISSUE_NUMBER);
        let title = rng.sentence();
        let body = rng.paragraph();
        let assignee = if rng.chance(self.unassigned_issue_percent) {
            None
        } else {
            Some(self.users.pick(rng).to_string())
        };
        Issue {
            id,
            number,
            title,
            body,
            assignee,
        }
    }

    /// An open entry for a random user, started some time in the last 30 days.
    pub fn new_time_entry(&self, rng: &mut dyn RandomSource, now: DateTime<Utc>) -> TimeEntry {
        let user = self.users.pick(rng).to_string();
        let age = rng.range(1, MAX_ENTRY_AGE_SECS) as i64;
        TimeEntry {
            user,
            start: now - Duration::seconds(age),
            end: None,
        }
    }

    /// Between zero and `max` commits.
    pub fn commit_batch(&self, rng: &mut dyn RandomSource, max: u32) -> Vec<Commit> {
        let count = rng.range(0, u64::from(max));
        (0..count).map(|_| self.new_commit(rng)).collect()
    }

    /// Between zero and `max` issues, numbered from `first_id`.
    pub fn issue_batch(&self, rng: &mut dyn RandomSource, first_id: u64, max: u32) -> Vec<Issue> {
        let count = rng.range(0, u64::from(max));
        (0..count).map(|n| self.new_issue(rng, first_id + n)).collect()
    }
}

fn random_uuid(rng: &mut dyn RandomSource) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}
