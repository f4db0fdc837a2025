use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("issue not found: {0}")]
    IssueNotFound(u64),

    #[error("incident not found: {0}")]
    IncidentNotFound(String),

    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
