//! CLI library components for tabq.

pub mod cli;
pub mod commands;
pub mod console;
pub mod logging;
pub mod summary;
pub mod types;
