//! pyzpack - Python app packer with a content-addressed dependency cache
//!
//! Packs an application directory plus its pip-resolved dependencies into a
//! single executable `.pyz` archive via shiv. The pip install is skipped
//! whenever the requirements manifest is byte-identical to the one recorded
//! by the last successful install, and stale per-build runtime cache entries
//! can be reclaimed from the shared cache root.

pub mod build;
pub mod cache;
pub mod cli;
pub mod config;
pub mod diag;
pub mod error;
pub mod tools;

pub use error::{PyzpackError, PyzpackResult};
