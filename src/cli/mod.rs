//! CLI module for the OCI client.
//!
//! This module provides the command-line interface: clap definitions and
//! the output formatter.

mod commands;
mod output;

pub use commands::{Cli, Commands, CompartmentCommands, CreateArgs, InstanceCommands, OutputFormat};
pub use output::OutputFormatter;
