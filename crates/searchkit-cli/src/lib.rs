//! CLI library components for the SearchKit driver.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
