//! Provider implementations

pub mod github;
pub mod local;
pub mod memory;
