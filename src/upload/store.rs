//! Object storage clients.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::RequestChecksumCalculation;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use thiserror::Error;

/// Errors returned by an [`ObjectStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object body could not be read from disk.
    #[error("error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store answered the write with a non-success status.
    #[error("store returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response.
    #[error("put object failed: {0}")]
    Request(String),
}

impl From<SdkError<PutObjectError>> for StoreError {
    fn from(err: SdkError<PutObjectError>) -> Self {
        let message = DisplayErrorContext(&err).to_string();
        match err.raw_response() {
            Some(response) => StoreError::Rejected {
                status: response.status().as_u16(),
                message,
            },
            None => StoreError::Request(message),
        }
    }
}

/// Upload side of an object store: whole-object writes that replace any
/// existing object under the same key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream the current contents of `path` into `bucket/key`.
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError>;
}

/// S3 store signed with credentials from the AWS SDK.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    /// Store built from a loaded SDK config. A custom endpoint switches to
    /// path-style addressing.
    pub fn new(config: &SdkConfig) -> Self {
        let conf = aws_sdk_s3::config::Builder::from(config)
            .force_path_style(config.endpoint_url().is_some())
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build();
        Self {
            client: S3Client::from_conf(conf),
        }
    }

    /// Store for `region` using the default credential chain, optionally
    /// pointed at a custom endpoint.
    pub async fn from_env(region: &str, endpoint: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        Self::new(&loader.load().await)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError> {
        let body = ByteStream::from_path(path).await.map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: io::Error::other(e),
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await?;
        Ok(())
    }
}

/// An in-process store that keeps the latest body per object.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    puts: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest body stored under `bucket/key`.
    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of puts received so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError> {
        let body = tokio::fs::read(path).await.map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((bucket.to_string(), key.to_string()), body);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
