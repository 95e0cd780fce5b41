//! CLI module - argument parsing, command dispatch and rendering

pub mod args;
pub mod charts;
pub mod commands;
pub mod helpers;
pub mod page;
pub mod render;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
