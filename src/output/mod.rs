//! File output management.
//!
//! # Data Flow
//! ```text
//! open_file(path)   → open (append, create) → sink tees console + file
//! rotate_file()     → reopen same path → swap sink → release old handle
//! close_file()      → sink console only → sync + drop handle
//!
//! Writers:
//!     engine → OutputSink::make_writer (loads current file atomically)
//!            → TeeWriter (stdout, then file)
//! ```
//!
//! # Design Decisions
//! - The file is swapped with `arc-swap`, so writers never take a lock
//! - An old handle lives until its last in-flight writer is done
//! - Files are always opened in append mode; rotating without an external
//!   rename keeps writing to the same file

pub mod manager;
pub mod sink;

pub use manager::{OutputError, OutputManager, Rotation};
pub use sink::{OutputSink, TeeWriter};
