//! Context propagation.
//!
//! # Data Flow
//! ```text
//! Context::background()
//!     → LogRuntime::with(ctx, fields)   (derive + bind, new child context)
//!     → LogRuntime::from_context(ctx)   (nearest bound logger, else default)
//!
//! Async tasks:
//!     context::scope(ctx, fut) → context::current() inside fut
//! ```
//!
//! # Design Decisions
//! - Contexts are immutable; binding always yields a new child
//! - At most one logger is visible per context (the nearest binding)
//! - Asking for the ambient context outside a scope is a programmer error

mod binding;
mod carrier;
mod scope;

pub(crate) use binding::{bind, bound};
pub use carrier::Context;
pub use scope::{current, scope, sync_scope, try_current};
