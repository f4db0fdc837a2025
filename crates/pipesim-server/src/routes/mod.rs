pub mod events;
pub mod health;
pub mod incidents;
pub mod issues;
pub mod pipeline;
pub mod time_entries;
