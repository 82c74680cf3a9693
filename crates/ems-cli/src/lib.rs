//! CLI library components for the fire/EMS data formatter.

pub mod config;
pub mod logging;
pub mod pipeline;
