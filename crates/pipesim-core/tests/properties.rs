use chrono::Utc;
use pipesim_core::config::SimConfig;
use pipesim_core::store::Snapshot;
use pipesim_core::types::{DeploymentStatus, PullRequestStatus};
use pipesim_core::Simulation;
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn simulation(seed: u64) -> Simulation {
    Simulation::new(SimConfig {
        seed: Some(seed),
        ..SimConfig::default()
    })
    .unwrap()
}

/// Check every structural invariant that must hold between ticks.
fn assert_invariants(snap: &Snapshot) {
    let shas: HashSet<&str> = snap.commits.iter().map(|c| c.sha.as_str()).collect();
    assert_eq!(shas.len(), snap.commits.len(), "duplicate commit sha");

    let mut claimed = HashSet::new();
    for pr in &snap.pull_requests {
        assert!(!pr.commits.is_empty(), "empty pull request {}", pr.id);
        for sha in &pr.commits {
            assert!(shas.contains(sha.as_str()), "unknown commit {sha}");
            assert!(claimed.insert(sha.as_str()), "commit {sha} in two pull requests");
        }
    }

    let prs: HashMap<&str, _> = snap
        .pull_requests
        .iter()
        .map(|pr| (pr.id.as_str(), pr))
        .collect();
    let mut deployed = HashSet::new();
    for d in &snap.deployments {
        assert!((1..=2).contains(&d.pull_requests.len()));
        let mut expected = Vec::new();
        for id in &d.pull_requests {
            assert!(deployed.insert(id.as_str()), "pull request {id} deployed twice");
            let pr = prs[id.as_str()];
            assert_eq!(pr.status, PullRequestStatus::Merged);
            expected.extend(pr.commits.iter().cloned());
        }
        assert_eq!(d.commits, expected);
    }

    let mut open_users = HashSet::new();
    for entry in &snap.time_entries {
        match entry.end {
            None => assert!(open_users.insert(entry.user.as_str()), "two open entries"),
            Some(end) => assert!(end >= entry.start),
        }
    }
}

fn pr_statuses(snap: &Snapshot) -> HashMap<String, PullRequestStatus> {
    snap.pull_requests
        .iter()
        .map(|pr| (pr.id.clone(), pr.status))
        .collect()
}

fn deployment_statuses(snap: &Snapshot) -> HashMap<String, DeploymentStatus> {
    snap.deployments
        .iter()
        .map(|d| (d.id.clone(), d.status))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn invariants_hold_across_many_cycles() {
    for seed in [1, 2, 3, 42, 1_000] {
        let mut sim = simulation(seed);
        let mut prev = sim.store().snapshot();
        for _ in 0..60 {
            sim.cycle(Utc::now());
            let snap = sim.store().snapshot();
            assert_invariants(&snap);

            let before = pr_statuses(&prev);
            for (id, status) in pr_statuses(&snap) {
                if before.get(&id) == Some(&PullRequestStatus::Merged) {
                    assert_eq!(status, PullRequestStatus::Merged, "pull request reopened");
                }
            }

            let before = deployment_statuses(&prev);
            for (id, status) in deployment_statuses(&snap) {
                if let Some(old) = before.get(&id) {
                    assert!(
                        *old == status || old.can_transition_to(status),
                        "illegal deployment transition {old} -> {status}"
                    );
                }
            }
            prev = snap;
        }
    }
}

#[test]
fn one_half_tick_from_empty_state_stays_bounded() {
    for seed in 0..20 {
        let mut sim = simulation(seed);
        sim.half_tick(Utc::now());
        let snap = sim.store().snapshot();
        assert!(snap.commits.len() <= 10);
        assert_invariants(&snap);
    }
}

#[test]
fn one_cycle_from_empty_state_stays_bounded() {
    for seed in 0..50 {
        let mut sim = simulation(seed);
        sim.cycle(Utc::now());
        let snap = sim.store().snapshot();
        assert!(snap.commits.len() <= 10, "seed {seed}: {}", snap.commits.len());
        assert_invariants(&snap);
    }
}

#[test]
fn completion_is_gated_by_open_incidents() {
    let mut sim = simulation(9);
    let incident = sim.store_mut().report_incident("whatever", "pager went off");

    for _ in 0..40 {
        let queued_before: HashSet<String> = sim
            .store()
            .deployments()
            .iter()
            .filter(|d| d.status == DeploymentStatus::Queued)
            .map(|d| d.id.clone())
            .collect();
        let report = sim.cycle(Utc::now());
        assert!(report.completed.is_none());
        for d in sim.store().deployments() {
            if queued_before.contains(&d.id) {
                assert_eq!(d.status, DeploymentStatus::Queued);
            }
        }
    }

    let queued = sim
        .store()
        .deployments()
        .iter()
        .filter(|d| d.status == DeploymentStatus::Queued)
        .count();
    assert!(queued > 0, "forty cycles should queue something");

    sim.store_mut().resolve_incident(&incident.id).unwrap();
    let report = sim.cycle(Utc::now());
    let notice = report.completed.expect("a queued deployment resolves");
    assert!(matches!(
        notice.deployment.status,
        DeploymentStatus::Active | DeploymentStatus::Failed
    ));
}

#[test]
fn success_leaves_a_single_active_deployment() {
    let mut sim = Simulation::new(SimConfig {
        seed: Some(11),
        deployment_success_percent: 100,
        ..SimConfig::default()
    })
    .unwrap();
    for _ in 0..60 {
        let report = sim.cycle(Utc::now());
        if report.completed.is_some() {
            let active = sim
                .store()
                .deployments()
                .iter()
                .filter(|d| d.status == DeploymentStatus::Active)
                .count();
            assert_eq!(active, 1);
        }
    }
}

#[test]
fn assign_unknown_issue_leaves_issues_unchanged() {
    let mut sim = simulation(4);
    for _ in 0..3 {
        sim.cycle(Utc::now());
    }
    let before = sim.store().issues().snapshot();
    let missing = sim.store().next_issue_id() + 100;
    assert!(sim.store_mut().assign_issue(missing, Some("x".into())).is_err());
    assert_eq!(sim.store().issues().snapshot(), before);
}
