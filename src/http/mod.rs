//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → RequestIdLayer (request ID from header or UUID v4)
//!     → LogRuntime::with(background, request_id/method/route)
//!     → request extensions + ambient context for the handler future
//! ```

pub mod request;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, RequestIdService, X_REQUEST_ID};
