use crate::output::{print_json, Table};
use anyhow::{Context, Result};
use pipesim_core::issue::Issue;
use pipesim_core::users::CREATOR_AUTHOR;

fn fetch(url: &str, assignee: &str) -> Result<Vec<Issue>> {
    let endpoint = format!("{}/issues", url.trim_end_matches('/'));
    let issues = ureq::get(&endpoint)
        .query("assignee", assignee)
        .call()
        .with_context(|| format!("GET {endpoint} failed"))?
        .into_json::<Vec<Issue>>()
        .context("unexpected response body")?;
    Ok(issues)
}

pub fn run(url: &str, assignee: Option<&str>, json: bool) -> Result<()> {
    let assignee = assignee.unwrap_or(CREATOR_AUTHOR);
    let issues = fetch(url, assignee)?;

    if json {
        return print_json(&issues);
    }
    if issues.is_empty() {
        println!("No issues assigned to {assignee}.");
        return Ok(());
    }
    let mut table = Table::new(["ID", "NUMBER", "TITLE"]);
    for issue in &issues {
        table.row([issue.id.to_string(), format!("#{}", issue.number), issue.title.clone()]);
    }
    table.print();
    Ok(())
}
