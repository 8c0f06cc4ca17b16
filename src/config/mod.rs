//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogConfig (validated, immutable)
//!     → LogRuntime::new / LogRuntime::apply
//!
//! On change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → LogRuntime::apply (level and format take effect immediately)
//! ```
//!
//! # Design Decisions
//! - Every field has a default, so an empty file is valid
//! - Validation reports all problems, not just the first
//! - A reload that fails validation keeps the current configuration

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LogConfig, OutputConfig, UploadConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
