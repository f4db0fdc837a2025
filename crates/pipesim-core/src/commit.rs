use crate::registry::Keyed;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Hex SHA-256, unique across the simulation.
    pub sha: String,
    pub author: String,
}

impl Keyed for Commit {
    type Key = String;

    fn key(&self) -> &String {
        &self.sha
    }
}
