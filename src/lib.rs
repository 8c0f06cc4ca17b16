//! Context-propagated structured logging for the proxy.
//!
//! - [`Logger`]: immutable handles with inherited fields
//! - [`Context`]: immutable carrier binding a logger to a request path
//! - [`OutputManager`]: stdout plus a rotatable log file
//! - [`UploadScheduler`]: periodic full-file upload to object storage
//!
//! Everything hangs off a [`LogRuntime`], which owns the state a process
//! would otherwise keep in globals.

pub mod config;
pub mod context;
pub mod http;
pub mod lifecycle;
pub mod logger;
pub mod output;
pub mod runtime;
pub mod upload;

pub use config::LogConfig;
pub use context::Context;
pub use lifecycle::Shutdown;
pub use logger::{fields, FieldSet, Format, Level, LineWriter, Logger};
pub use output::{OutputError, OutputManager};
pub use runtime::LogRuntime;
pub use upload::{ObjectStore, UploadScheduler, UploadTask};
