pub mod config;
pub mod issues;
pub mod serve;
pub mod simulate;
