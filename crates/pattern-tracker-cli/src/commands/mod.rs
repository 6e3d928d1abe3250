//! CLI command implementations.

pub mod settings;
pub mod simulate;
