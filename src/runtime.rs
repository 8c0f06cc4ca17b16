//! The logging runtime: one engine, one output, one default logger.
//!
//! A `LogRuntime` is the explicit owner of what would otherwise be process
//! globals. Clone it to share it; every clone sees the same level, format,
//! file, and default logger. Independent runtimes do not interact.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::{LogConfig, OutputConfig};
use crate::context::{self, Context};
use crate::logger::{Engine, FieldSet, Format, Level, LineWriter, Logger};
use crate::output::{OutputError, OutputManager, Rotation};
use crate::upload::{ObjectStore, UploadScheduler};

#[derive(Clone)]
pub struct LogRuntime {
    inner: Arc<Inner>,
}

struct Inner {
    engine: Arc<Engine>,
    output: OutputManager,
    default: ArcSwap<Logger>,
}

impl LogRuntime {
    /// Runtime writing text records at `info` to stdout.
    pub fn new() -> Self {
        Self::with_settings(Level::Info, Format::Text)
    }

    pub fn with_settings(level: Level, format: Format) -> Self {
        let output = OutputManager::new();
        let engine = Arc::new(Engine::new(level, format, output.sink()));
        let default = Logger::new(Arc::clone(&engine));

        Self {
            inner: Arc::new(Inner {
                engine,
                output,
                default: ArcSwap::from_pointee(default),
            }),
        }
    }

    /// Runtime with the level and format of `config`. The file, if any, is
    /// opened separately with [`LogRuntime::open_file`].
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_settings(config.level, config.format)
    }

    /// Apply the reloadable parts of a new configuration.
    pub fn apply(&self, config: &LogConfig) {
        let previous = (self.level(), self.format());
        self.set_level(config.log.level);
        self.set_format(config.log.format);
        if previous != (config.log.level, config.log.format) {
            self.without_context().info(format!(
                "log settings changed: level={} format={:?}",
                config.log.level, config.log.format
            ));
        }
    }

    pub fn level(&self) -> Level {
        self.inner.engine.level()
    }

    /// Set the level for every logger of this runtime.
    pub fn set_level(&self, level: Level) {
        self.inner.engine.set_level(level);
    }

    pub fn format(&self) -> Format {
        self.inner.engine.format()
    }

    pub fn set_format(&self, format: Format) {
        self.inner.engine.set_format(format);
    }

    /// The default logger, bypassing any context.
    pub fn without_context(&self) -> Logger {
        Logger::clone(&self.inner.default.load())
    }

    /// Replace the default logger.
    pub fn set_default(&self, logger: Logger) {
        self.inner.default.store(Arc::new(logger));
    }

    /// The logger bound to `ctx`, or the default logger.
    pub fn from_context(&self, ctx: &Context) -> Logger {
        context::bound(ctx).unwrap_or_else(|| self.without_context())
    }

    /// The logger bound to the ambient context.
    ///
    /// # Panics
    ///
    /// Panics when no context is in scope; see [`context::current`].
    pub fn from_current(&self) -> Logger {
        self.from_context(&context::current())
    }

    /// Derive the logger of `ctx` with `fields` and bind it in a child
    /// context. `ctx` itself is left unchanged.
    pub fn with(&self, ctx: &Context, fields: impl Into<FieldSet>) -> Context {
        let logger = self.from_context(ctx).derive(fields);
        context::bind(ctx, logger)
    }

    /// A line writer on the default logger.
    pub fn writer(&self, level: Level) -> LineWriter {
        self.without_context().writer(level)
    }

    pub fn output(&self) -> &OutputManager {
        &self.inner.output
    }

    /// Tee records to `path`, appending.
    pub fn open_file(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        self.inner.output.open_file(path)
    }

    /// Stop writing to the file and return to console-only output.
    pub fn close_file(&self) -> Result<(), OutputError> {
        self.inner.output.close_file()
    }

    /// Reopen the log file after an external rotation. Does nothing when
    /// output is not file backed.
    pub fn rotate_file(&self) -> Result<(), OutputError> {
        let logger = self.without_context();
        match self.inner.output.rotate_file()? {
            Rotation::Skipped => {
                logger.debug("log is not writing to a file, ignoring rotate request");
            }
            Rotation::Reopened { close_error: Some(e) } => {
                logger.warn(format!("error closing previous log file: {}", e));
            }
            Rotation::Reopened { close_error: None } => {}
        }
        Ok(())
    }

    /// An upload scheduler that reports through the default logger.
    pub fn uploader(&self, store: Arc<dyn ObjectStore>) -> UploadScheduler {
        UploadScheduler::new(store, self.without_context())
    }
}

impl Default for LogRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRuntime")
            .field("engine", &self.inner.engine)
            .field("output", &self.inner.output)
            .finish_non_exhaustive()
    }
}
