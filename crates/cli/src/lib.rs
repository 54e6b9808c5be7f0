//! Command-line front end for the widget verification engine.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;
