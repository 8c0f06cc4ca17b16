//! Log file lifecycle: open, close, and reopen-for-rotation.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::output::sink::OutputSink;

/// Errors from file output operations.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The log file could not be opened.
    #[error("error opening log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The log file could not be flushed to disk while closing.
    #[error("error closing log file: {0}")]
    Close(#[source] io::Error),
}

/// What a rotation request did.
#[derive(Debug)]
pub enum Rotation {
    /// No file was ever configured; nothing was touched.
    Skipped,
    /// The file was reopened at its path. `close_error` reports a failure
    /// to sync the previous handle, which does not fail the rotation.
    Reopened { close_error: Option<io::Error> },
}

#[derive(Debug, Default)]
struct OutputState {
    path: Option<PathBuf>,
    file: Option<Arc<File>>,
}

/// Owns the current log file path and handle and the sink that writers use.
///
/// Cloning yields another handle to the same state. State changes are
/// serialized; writers are never blocked by them.
#[derive(Debug, Clone, Default)]
pub struct OutputManager {
    state: Arc<Mutex<OutputState>>,
    sink: OutputSink,
}

impl OutputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sink the logging engine writes through.
    pub fn sink(&self) -> OutputSink {
        self.sink.clone()
    }

    /// The configured file path, if any.
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path.clone()
    }

    /// Whether a file handle is currently open.
    pub fn has_file(&self) -> bool {
        self.lock().file.is_some()
    }

    /// Open `path` for appending, creating it if needed, and tee output to it.
    ///
    /// The path is recorded even when opening fails; in that case the handle
    /// is cleared and output falls back to the console until a later open or
    /// rotation succeeds. An empty path means no file backing: any open file
    /// is closed and later rotations are no-ops.
    pub fn open_file(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        let path = path.as_ref();
        let mut state = self.lock();
        if path.as_os_str().is_empty() {
            state.path = None;
            return self.detach(&mut state);
        }
        state.path = Some(path.to_path_buf());
        self.reopen(&mut state).map(|_| ())
    }

    /// Return output to the console and close the file, if any.
    pub fn close_file(&self) -> Result<(), OutputError> {
        let mut state = self.lock();
        self.detach(&mut state)
    }

    /// Reopen the configured path so that a file renamed by an external
    /// rotator is released and a fresh one is written at the same path.
    pub fn rotate_file(&self) -> Result<Rotation, OutputError> {
        let mut state = self.lock();
        if state.path.is_none() && state.file.is_none() {
            return Ok(Rotation::Skipped);
        }

        let previous = self.reopen(&mut state)?;
        let close_error = previous.and_then(|file| file.sync_all().err());
        Ok(Rotation::Reopened { close_error })
    }

    /// Open the recorded path and swap it in, returning the replaced handle.
    fn reopen(&self, state: &mut OutputState) -> Result<Option<Arc<File>>, OutputError> {
        let path = state.path.clone().unwrap_or_default();
        match open_append(&path) {
            Ok(file) => {
                let file = Arc::new(file);
                self.sink.tee_to(Arc::clone(&file));
                Ok(state.file.replace(file))
            }
            Err(source) => {
                self.sink.console_only();
                state.file = None;
                Err(OutputError::Open { path, source })
            }
        }
    }

    fn detach(&self, state: &mut OutputState) -> Result<(), OutputError> {
        self.sink.console_only();
        match state.file.take() {
            Some(file) => file.sync_all().map_err(OutputError::Close),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, OutputState> {
        // A panic while holding the lock cannot leave the state half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }
    options.open(path)
}
