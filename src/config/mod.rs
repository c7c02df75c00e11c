//! Configuration module for wmd
//!
//! This module handles the engine settings, including
//! serialization/deserialization to/from JSON and persistent storage
//! in the platform-specific configuration directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
