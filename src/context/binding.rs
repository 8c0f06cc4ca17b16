//! Loggers bound to contexts.

use crate::context::Context;
use crate::logger::Logger;

/// Private key type: only this module can bind or read a context logger.
struct BoundLogger(Logger);

/// Return a child of `ctx` with `logger` bound.
pub(crate) fn bind(ctx: &Context, logger: Logger) -> Context {
    ctx.with_value(BoundLogger(logger))
}

/// The logger bound to `ctx` or its nearest ancestor.
pub(crate) fn bound(ctx: &Context) -> Option<Logger> {
    ctx.value::<BoundLogger>().map(|bound| bound.0.clone())
}
