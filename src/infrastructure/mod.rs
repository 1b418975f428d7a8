//! Infrastructure layer for filesystem and environment interactions.
//!
//! Provides path handling for configured catalog and log locations.

pub mod paths;

pub use paths::{data_dir, expand_tilde, resolve_log_path};
