//! External tool collaborators
//!
//! pip and shiv do the heavy lifting; this module wraps each behind a small
//! trait so the build pipeline can be exercised without spawning real
//! processes. Both run with inherited stdio and report failure through the
//! exit status.

pub mod installer;
pub mod packager;

pub use installer::{Installer, PipInstaller};
pub use packager::{PackageBuilder, PackageSpec, ShivPackager};
