//! Ambient context for async tasks.

use std::future::Future;

use crate::context::Context;

tokio::task_local! {
    static CURRENT: Context;
}

/// Run `future` with `ctx` as its ambient context.
pub async fn scope<F: Future>(ctx: Context, future: F) -> F::Output {
    CURRENT.scope(ctx, future).await
}

/// Run `f` synchronously with `ctx` as the ambient context.
pub fn sync_scope<R>(ctx: Context, f: impl FnOnce() -> R) -> R {
    CURRENT.sync_scope(ctx, f)
}

/// The ambient context, if the caller runs inside [`scope`].
pub fn try_current() -> Option<Context> {
    CURRENT.try_with(Context::clone).ok()
}

/// The ambient context.
///
/// # Panics
///
/// Panics when called outside [`scope`] or [`sync_scope`]. Code with no
/// natural context should use `Context::background()` or
/// `LogRuntime::without_context()` explicitly.
pub fn current() -> Context {
    match try_current() {
        Some(ctx) => ctx,
        None => panic!("invalid argument: no execution context is in scope"),
    }
}
