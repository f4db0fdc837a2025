pub mod claims;
pub mod commit;
pub mod config;
pub mod deployment;
pub mod error;
pub mod factory;
pub mod incident;
pub mod io;
pub mod issue;
pub mod pull_request;
pub mod random;
pub mod registry;
pub mod simulation;
pub mod store;
pub mod time_entry;
pub mod types;
pub mod users;

pub use error::{Result, SimError};
pub use simulation::Simulation;
