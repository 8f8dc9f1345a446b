pub mod actions;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod journal;
pub mod output;
pub mod persist;
pub mod power;
pub mod profile;
pub mod reconcile;
pub mod status;
pub mod sysfs;
pub mod system;
pub mod transition;
