//! Log output for hosts embedding the catalog.
//!
//! The library itself only emits `tracing` spans and events. A host that wants
//! them printed calls [`init_tracing`] once at startup.
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! With `log_file` set, output goes to a file that rotates at 10 MB and keeps
//! three backups.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `file_writer`: rotating file writer

mod file_writer;
mod init;

pub use file_writer::{RotatingFileWriter, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::init_tracing;
