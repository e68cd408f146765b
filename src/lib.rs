pub mod cli;
pub mod config;
pub mod handoff;
pub mod logging;
pub mod vault;
