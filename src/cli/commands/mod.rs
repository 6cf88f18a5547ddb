//! Command implementations

pub mod completions;
pub mod ctrl;
pub mod import;
pub mod init;
pub mod policy;
