use crate::registry::Keyed;
use serde::{Deserialize, Serialize};

/// An externally reported problem with a deployment. While any incident is
/// open, deployment completion is suspended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub deployment_id: String,
    pub message: String,
}

impl Incident {
    pub fn new(deployment_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            deployment_id: deployment_id.into(),
            message: message.into(),
        }
    }
}

impl Keyed for Incident {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }
}
