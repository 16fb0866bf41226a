// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for prcheck.
//!
//! This module handles loading and parsing configuration files and layering
//! command-line and environment values on top of them.

pub mod default;
mod loader;
mod schema;

pub use default::default_config;
pub use loader::{
    apply_overrides, compile_pattern, find_config_file, load_config, validate_config, Overrides,
};
pub use schema::*;
