//! Subcommand implementations

pub mod decode;
pub mod probe;
pub mod scan;
