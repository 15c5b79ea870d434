//! Configuration module for the OCI client.
//!
//! This module handles all configuration-related functionality:
//! - Parsing the INI-style OCI config file
//! - Selecting a named credential profile
//! - Loading `.env` overrides for env-backed flags

mod parser;
mod profile;

pub use parser::{ConfigParser, default_config_path};
pub use profile::{DEFAULT_PROFILE, Profile};
