//! Request-scoped logging context.
//!
//! Every request gets a request ID (taken from `x-request-id` when the
//! client sent one, generated otherwise) and a context whose logger carries
//! `request_id`, `method`, and `route`. Handlers find the context in the
//! request extensions, and the handler future runs with it as the ambient
//! context.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::context::{self, Context};
use crate::logger::fields;
use crate::LogRuntime;

/// Request header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The ID assigned to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Accessors for what [`RequestIdLayer`] attaches to a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
    fn log_context(&self) -> Option<&Context>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }

    fn log_context(&self) -> Option<&Context> {
        self.extensions().get::<Context>()
    }
}

/// Tower layer binding a request logger into each request.
#[derive(Debug, Clone)]
pub struct RequestIdLayer {
    runtime: LogRuntime,
}

impl RequestIdLayer {
    pub fn new(runtime: LogRuntime) -> Self {
        Self { runtime }
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService {
            inner,
            runtime: self.runtime.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
    runtime: LogRuntime,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if let Ok(value) = HeaderValue::from_str(&id) {
            request.headers_mut().insert(X_REQUEST_ID, value);
        }

        let ctx = self.runtime.with(
            &Context::background(),
            [
                fields::str("request_id", id.clone()),
                fields::str("method", request.method().as_str()),
                fields::str("route", request.uri().path()),
            ],
        );
        request.extensions_mut().insert(RequestId(id));
        request.extensions_mut().insert(ctx.clone());

        let future = self.inner.call(request);
        Box::pin(context::scope(ctx, future))
    }
}
