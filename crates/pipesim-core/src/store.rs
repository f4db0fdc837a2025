use crate::claims::ClaimIndex;
use crate::commit::Commit;
use crate::deployment::Deployment;
use crate::error::{Result, SimError};
use crate::incident::Incident;
use crate::issue::{self, Issue};
use crate::pull_request::PullRequest;
use crate::registry::Registry;
use crate::time_entry::{TimeEntry, TimeSheet};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Owned copy of every collection, safe to hand across the lock boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub commits: Vec<Commit>,
    pub pull_requests: Vec<PullRequest>,
    pub deployments: Vec<Deployment>,
    pub issues: Vec<Issue>,
    pub incidents: Vec<Incident>,
    pub time_entries: Vec<TimeEntry>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// The authoritative in-memory collections.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) commits: Registry<Commit>,
    pub(crate) pull_requests: Registry<PullRequest>,
    pub(crate) deployments: Registry<Deployment>,
    pub(crate) issues: Registry<Issue>,
    pub(crate) incidents: Registry<Incident>,
    pub(crate) time_entries: TimeSheet,
    pub(crate) claims: ClaimIndex,
    last_issue_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------------

    pub fn commits(&self) -> &Registry<Commit> {
        &self.commits
    }

    pub fn pull_requests(&self) -> &Registry<PullRequest> {
        &self.pull_requests
    }

    pub fn deployments(&self) -> &Registry<Deployment> {
        &self.deployments
    }

    pub fn issues(&self) -> &Registry<Issue> {
        &self.issues
    }

    pub fn incidents(&self) -> &Registry<Incident> {
        &self.incidents
    }

    pub fn time_entries(&self) -> &[TimeEntry] {
        self.time_entries.as_slice()
    }

    pub fn claims(&self) -> &ClaimIndex {
        &self.claims
    }

    pub fn has_open_incidents(&self) -> bool {
        !self.incidents.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            commits: self.commits.snapshot(),
            pull_requests: self.pull_requests.snapshot(),
            deployments: self.deployments.snapshot(),
            issues: self.issues.snapshot(),
            incidents: self.incidents.snapshot(),
            time_entries: self.time_entries.snapshot(),
        }
    }

    // ---------------------------------------------------------------------------
    // Generation inserts
    // ---------------------------------------------------------------------------

    /// First id the next generated issue should take.
    pub fn next_issue_id(&self) -> u64 {
        self.last_issue_id + 1
    }

    pub fn add_commits(&mut self, commits: Vec<Commit>) {
        for commit in commits {
            if !self.commits.insert(commit) {
                tracing::warn!("duplicate commit sha generated; dropped");
            }
        }
    }

    /// Insert pull requests, claiming their commits. Returns how many were
    /// stored; a pull request whose commits are already claimed is refused.
    pub fn add_pull_requests(&mut self, prs: Vec<PullRequest>) -> usize {
        let mut added = 0;
        for pr in prs {
            if self.pull_requests.contains(&pr.id) || !self.claims.claim_commits(&pr) {
                tracing::error!(pull_request = %pr.id, "refusing pull request with claimed commits");
                continue;
            }
            self.pull_requests.insert(pr);
            added += 1;
        }
        added
    }

    pub fn add_issues(&mut self, issues: Vec<Issue>) {
        for issue in issues {
            self.last_issue_id = self.last_issue_id.max(issue.id);
            self.issues.insert(issue);
        }
    }

    pub fn add_deployment(&mut self, deployment: Deployment) {
        self.deployments.insert(deployment);
    }

    // ---------------------------------------------------------------------------
    // External mutations
    // ---------------------------------------------------------------------------

    pub fn assign_issue(&mut self, id: u64, assignee: Option<String>) -> Result<Issue> {
        let issue = issue::assign_issue(&mut self.issues, id, assignee)?;
        tracing::info!(issue = id, assignee = ?issue.assignee, "issue assigned");
        Ok(issue)
    }

    pub fn report_incident(
        &mut self,
        deployment_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Incident {
        let incident = Incident::new(deployment_id, message);
        self.incidents.insert(incident.clone());
        tracing::info!(
            incident = %incident.id,
            deployment = %incident.deployment_id,
            open = self.incidents.len(),
            "incident reported"
        );
        incident
    }

    pub fn resolve_incident(&mut self, id: &str) -> Result<Incident> {
        let incident = self
            .incidents
            .remove(&id.to_string())
            .ok_or_else(|| SimError::IncidentNotFound(id.to_string()))?;
        tracing::info!(incident = %incident.id, open = self.incidents.len(), "incident resolved");
        Ok(incident)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
