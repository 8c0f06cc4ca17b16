//! Field logger core.
//!
//! # Data Flow
//! ```text
//! Logger::derive (merge fields, copy-on-derive)
//!     → Logger::log / LineWriter (one record per line)
//!     → Engine (per-runtime tracing dispatcher, reloadable level)
//!     → RecordFormat (text or JSON)
//!     → output sink (console, optionally tee'd to a file)
//! ```
//!
//! # Design Decisions
//! - Handles are immutable; deriving allocates a new field set
//! - Level and format are shared by every handle of one runtime
//! - Logging never returns errors to the caller

mod engine;
pub mod fields;
mod format;
mod handle;
mod level;
mod writer;

pub(crate) use engine::Engine;
pub use engine::TARGET;
pub use fields::{Field, FieldSet};
pub use format::Format;
pub use handle::Logger;
pub use level::{Level, ParseLevelError};
pub use writer::LineWriter;
