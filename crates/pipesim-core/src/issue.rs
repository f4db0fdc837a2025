use crate::error::{Result, SimError};
use crate::registry::{Keyed, Registry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Store-assigned, 1-based. This is the `issue_id` external callers use.
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub assignee: Option<String>,
}

impl Keyed for Issue {
    type Key = u64;

    fn key(&self) -> &u64 {
        &self.id
    }
}

/// Overwrite the assignee of issue `id`. `None` unassigns.
pub fn assign_issue(
    issues: &mut Registry<Issue>,
    id: u64,
    assignee: Option<String>,
) -> Result<Issue> {
    let issue = issues.get_mut(&id).ok_or(SimError::IssueNotFound(id))?;
    issue.assignee = assignee;
    Ok(issue.clone())
}

/// Issues whose assignee equals `assignee`.
pub fn assigned_to<'a>(issues: &'a [Issue], assignee: &str) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|i| i.assignee.as_deref() == Some(assignee))
        .collect()
}
