//! Periodic log upload.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::lifecycle::Shutdown;
use crate::logger::{fields, Level, Logger};
use crate::upload::destination::{hostname, Destination, ENVIRONMENT_VAR};
use crate::upload::store::{ObjectStore, StoreError};

/// Default time between uploads.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// A failed upload tick.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("error reading log file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error uploading log file: {0}")]
    Store(#[from] StoreError),
}

/// Starts upload loops that ship a snapshot of a log file to object storage.
#[derive(Clone)]
pub struct UploadScheduler {
    store: Arc<dyn ObjectStore>,
    interval: Duration,
    logger: Logger,
}

impl UploadScheduler {
    pub fn new(store: Arc<dyn ObjectStore>, logger: Logger) -> Self {
        Self {
            store,
            interval: DEFAULT_INTERVAL,
            logger,
        }
    }

    /// Override the time between uploads.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start uploading `path` using the environment named by
    /// [`ENVIRONMENT_VAR`].
    ///
    /// Returns `None`, after logging why, when the variable is unset or the
    /// path is empty. Must be called from within a Tokio runtime.
    pub fn start(&self, path: impl AsRef<Path>) -> Option<UploadTask> {
        let environment = std::env::var(ENVIRONMENT_VAR).ok();
        self.start_with_environment(path, environment.as_deref())
    }

    /// Like [`UploadScheduler::start`] with the environment name given
    /// explicitly.
    pub fn start_with_environment(
        &self,
        path: impl AsRef<Path>,
        environment: Option<&str>,
    ) -> Option<UploadTask> {
        let path = path.as_ref().to_path_buf();
        let environment = match environment {
            Some(env) if !path.as_os_str().is_empty() => env,
            _ => {
                self.logger.info(format!(
                    "{} is not set or the log file path is not set. Not uploading logs",
                    ENVIRONMENT_VAR
                ));
                return None;
            }
        };

        let destination = Destination::new(environment, &hostname());
        let worker = UploadWorker {
            path: path.clone(),
            destination: destination.clone(),
            store: Arc::clone(&self.store),
            interval: self.interval,
            logger: self.logger.derive([
                fields::str("component", "upload"),
                fields::str("destination", destination.to_string()),
            ]),
        };

        let logger = worker.logger.clone();
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(worker.run(shutdown.subscribe()));

        Some(UploadTask {
            path,
            destination,
            shutdown,
            handle,
            logger,
        })
    }
}

/// Handle to a running upload loop.
///
/// Dropping the handle cancels the loop; [`UploadTask::stop`] also waits
/// for it to exit.
#[must_use = "dropping an UploadTask stops its upload loop"]
pub struct UploadTask {
    path: PathBuf,
    destination: Destination,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
    logger: Logger,
}

impl UploadTask {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Ask the loop to stop. No tick starts after the loop observes this.
    pub fn cancel(&self) {
        self.shutdown.trigger();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the loop and wait until it has exited. A loop that died by
    /// panicking is reported through the task's logger.
    pub async fn stop(mut self) {
        self.cancel();
        if let Err(e) = (&mut self.handle).await {
            self.logger.error(format!("upload loop exited abnormally: {}", e));
        }
    }
}

impl Drop for UploadTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct UploadWorker {
    path: PathBuf,
    destination: Destination,
    store: Arc<dyn ObjectStore>,
    interval: Duration,
    logger: Logger,
}

impl UploadWorker {
    async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        self.logger.debug(format!(
            "upload loop starting for {} every {:?}",
            self.path.display(),
            self.interval
        ));

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = shutdown.recv() => break,
                        result = self.upload_once() => {
                            if let Err(e) = result {
                                self.logger.error(e);
                            }
                        }
                    }
                }
            }
        }

        self.logger.debug("upload loop stopped");
    }

    /// Stream the whole file from a fresh handle and replace the remote object.
    async fn upload_once(&self) -> Result<(), UploadError> {
        let size = tokio::fs::metadata(&self.path)
            .await
            .map_err(|source| UploadError::Read {
                path: self.path.clone(),
                source,
            })?
            .len();

        self.store
            .put_file(&self.destination.bucket, &self.destination.key, &self.path)
            .await?;

        self.logger
            .log_with(Level::Debug, "uploaded log file", [fields::str("bytes", size.to_string())]);
        Ok(())
    }
}
