//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::put;
use axum::Router;
use tokio::net::TcpListener;

use proxy_log::upload::{ObjectStore, StoreError};

/// Lines of a log file, without trailing newlines.
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Poll `cond` until it holds or `timeout` elapses.
pub async fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

/// A store that rejects every upload and counts the attempts.
#[derive(Default)]
pub struct FailingStore {
    attempts: Mutex<usize>,
}

impl FailingStore {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put_file(&self, _bucket: &str, _key: &str, _path: &Path) -> Result<(), StoreError> {
        *self.attempts.lock().unwrap() += 1;
        Err(StoreError::Rejected {
            status: 503,
            message: "unavailable".into(),
        })
    }
}

/// A store whose every upload panics.
pub struct PanickingStore;

#[async_trait]
impl ObjectStore for PanickingStore {
    async fn put_file(&self, _bucket: &str, _key: &str, _path: &Path) -> Result<(), StoreError> {
        panic!("store exploded");
    }
}

/// One `PUT` seen by the mock store.
#[derive(Debug, Clone)]
pub struct ReceivedObject {
    pub key: String,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

pub type Received = Arc<Mutex<Vec<ReceivedObject>>>;

/// Start a mock object store answering every `PUT` with `status`.
pub async fn start_mock_store(status: StatusCode) -> (SocketAddr, Received) {
    let received: Received = Arc::default();
    let state = (received.clone(), status);

    let app = Router::new()
        .route("/{*key}", put(store_object))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, received)
}

async fn store_object(
    State((received, status)): State<(Received, StatusCode)>,
    UrlPath(key): UrlPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    received.lock().unwrap().push(ReceivedObject {
        key,
        authorization,
        body: body.to_vec(),
    });
    status
}
