//! CLI command implementations

pub mod build;
pub mod cache;
pub mod init;

pub use build::execute as build;
pub use cache::execute as cache;
pub use init::execute as init;
