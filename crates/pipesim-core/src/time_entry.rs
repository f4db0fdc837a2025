use crate::factory::EntityFactory;
use crate::random::RandomSource;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub user: String,
    pub start: DateTime<Utc>,
    /// `None` while the entry is open.
    pub end: Option<DateTime<Utc>>,
}

impl TimeEntry {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// What a call to [`record_time_activity`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeActivity {
    Started { user: String },
    Stopped { user: String },
}

// ---------------------------------------------------------------------------
// TimeSheet
// ---------------------------------------------------------------------------

/// All time entries plus an index of the single open entry per user.
#[derive(Debug, Clone, Default)]
pub struct TimeSheet {
    entries: Vec<TimeEntry>,
    open: HashMap<String, usize>,
}

impl TimeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_entry(&self, user: &str) -> Option<&TimeEntry> {
        self.open.get(user).map(|&i| &self.entries[i])
    }

    /// Start `entry` unless its user already has an open entry, in which case
    /// the existing entry is closed at `close_at` instead.
    pub fn start_or_stop(
        &mut self,
        entry: TimeEntry,
        close_at: impl FnOnce(&TimeEntry) -> DateTime<Utc>,
    ) -> TimeActivity {
        match self.open.remove(&entry.user) {
            Some(i) => {
                let existing = &mut self.entries[i];
                existing.end = Some(close_at(existing));
                TimeActivity::Stopped {
                    user: existing.user.clone(),
                }
            }
            None => {
                let user = entry.user.clone();
                self.open.insert(user.clone(), self.entries.len());
                self.entries.push(TimeEntry { end: None, ..entry });
                TimeActivity::Started { user }
            }
        }
    }

    pub fn as_slice(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<TimeEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Time tracking rule
// ---------------------------------------------------------------------------

/// With probability `percent`, start or stop a timer for a random user.
pub fn record_time_activity(
    sheet: &mut TimeSheet,
    factory: &EntityFactory<'_>,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
    percent: u8,
) -> Option<TimeActivity> {
    if !rng.chance(percent) {
        return None;
    }
    let candidate = factory.new_time_entry(rng, now);
    let activity = sheet.start_or_stop(candidate, |open| random_between(rng, open.start, now));
    match &activity {
        TimeActivity::Started { user } => tracing::debug!(%user, "time entry started"),
        TimeActivity::Stopped { user } => tracing::debug!(%user, "time entry stopped"),
    }
    Some(activity)
}

/// Uniform instant in `from..=to` at second resolution; `from` if `to < from`.
fn random_between(
    rng: &mut dyn RandomSource,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> DateTime<Utc> {
    let span = (to - from).num_seconds();
    if span <= 0 {
        return from;
    }
    from + Duration::seconds(rng.range(0, span as u64) as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};
    use crate::users::UserPool;

    fn entry(user: &str, start: DateTime<Utc>) -> TimeEntry {
        TimeEntry {
            user: user.to_string(),
            start,
            end: None,
        }
    }

    #[test]
    fn second_start_for_same_user_closes_the_first() {
        let now = Utc::now();
        let start = now - Duration::hours(2);
        let mut sheet = TimeSheet::new();

        let first = sheet.start_or_stop(entry("ann", start), |_| now);
        assert_eq!(first, TimeActivity::Started { user: "ann".into() });
        assert!(sheet.open_entry("ann").is_some());

        let second = sheet.start_or_stop(entry("ann", now), |_| now);
        assert_eq!(second, TimeActivity::Stopped { user: "ann".into() });
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.as_slice()[0].end, Some(now));
        assert!(sheet.open_entry("ann").is_none());

        // A third call starts a fresh entry.
        sheet.start_or_stop(entry("ann", now), |_| now);
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn closing_time_lies_between_start_and_now() {
        let now = Utc::now();
        let start = now - Duration::days(3);
        let mut rng = SeededRandom::new(Some(4));
        for _ in 0..100 {
            let end = random_between(&mut rng, start, now);
            assert!(end >= start && end <= now);
        }
        assert_eq!(random_between(&mut rng, now, start), now);
    }

    #[test]
    fn low_roll_skips_activity() {
        let users = UserPool::from_names(["ann"]).unwrap();
        let factory = EntityFactory::new(&users, 30);
        let mut sheet = TimeSheet::new();
        // roll 50 >= 18 → nothing happens
        let mut rng = ScriptedRandom::new([50]);
        assert!(record_time_activity(&mut sheet, &factory, &mut rng, Utc::now(), 18).is_none());
        assert!(sheet.is_empty());
    }

    #[test]
    fn at_most_one_open_entry_per_user() {
        let users = UserPool::from_names(["ann", "bob", "cy"]).unwrap();
        let factory = EntityFactory::new(&users, 30);
        let mut sheet = TimeSheet::new();
        let mut rng = SeededRandom::new(Some(8));
        for _ in 0..200 {
            record_time_activity(&mut sheet, &factory, &mut rng, Utc::now(), 100);
            for user in users.as_slice() {
                let open = sheet
                    .as_slice()
                    .iter()
                    .filter(|e| &e.user == user && e.is_open())
                    .count();
                assert!(open <= 1, "{user} has {open} open entries");
            }
        }
        for e in sheet.as_slice() {
            if let Some(end) = e.end {
                assert!(end >= e.start);
            }
        }
    }
}
