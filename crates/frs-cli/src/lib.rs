//! CLI library components for the FRS toolkit.

pub mod commands;
pub mod logging;
