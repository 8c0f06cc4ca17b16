//! Log upload subsystem.
//!
//! # Data Flow
//! ```text
//! UploadScheduler::start(path)
//!     → VOLT_ENVIRONMENT unset or path empty → log, no task
//!     → Destination (voltage-<env>-system / traefik-logs/<host>/traefik.log)
//!     → UploadTask (spawned loop + shutdown handle)
//!
//! Every interval:
//!     stream whole file (own read handle) → ObjectStore::put_file (overwrite)
//!     failure → log, wait for next tick
//! ```
//!
//! # Design Decisions
//! - Full-snapshot uploads; the remote object is replaced every tick
//! - The loop never shares the writer's file handle
//! - Cancellation goes through an explicit handle returned to the caller

pub mod destination;
pub mod scheduler;
pub mod store;

pub use destination::{hostname, Destination, ENVIRONMENT_VAR};
pub use scheduler::{UploadError, UploadScheduler, UploadTask, DEFAULT_INTERVAL};
pub use store::{InMemoryStore, ObjectStore, S3ObjectStore, StoreError};
