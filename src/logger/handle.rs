//! Logger handles.

use std::fmt;
use std::sync::Arc;

use crate::logger::engine::{Engine, TARGET};
use crate::logger::fields::FieldSet;
use crate::logger::writer::LineWriter;
use crate::logger::Level;

/// A cheap, immutable handle to the runtime's logging engine plus a set of
/// fields stamped onto every record it emits.
///
/// Deriving never mutates the handle it is called on.
#[derive(Clone)]
pub struct Logger {
    engine: Arc<Engine>,
    fields: Arc<FieldSet>,
}

macro_rules! emit_at {
    ($level:expr, $fields:expr, $message:expr) => {
        tracing::event!(target: TARGET, $level, logger.fields = %$fields.to_json(), "{}", $message)
    };
}

impl Logger {
    pub(crate) fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            fields: Arc::new(FieldSet::new()),
        }
    }

    /// Fields stamped onto every record of this handle.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Derive a handle with `fields` applied on top of this handle's fields.
    pub fn derive(&self, fields: impl Into<FieldSet>) -> Logger {
        let fields = fields.into();
        if fields.is_empty() {
            return self.clone();
        }
        Logger {
            engine: Arc::clone(&self.engine),
            fields: Arc::new(self.fields.merged(&fields)),
        }
    }

    /// Whether two handles are the same instance.
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine) && Arc::ptr_eq(&self.fields, &other.fields)
    }

    /// Current process-wide level of the engine behind this handle.
    pub fn level(&self) -> Level {
        self.engine.level()
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.engine.level()
    }

    /// Emit one record. Sink failures never surface here.
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        self.emit(level, &self.fields, &message);
    }

    /// Emit one record with additional per-record fields.
    pub fn log_with(&self, level: Level, message: impl fmt::Display, extra: impl Into<FieldSet>) {
        let extra = extra.into();
        if extra.is_empty() {
            self.emit(level, &self.fields, &message);
        } else {
            self.emit(level, &self.fields.merged(&extra), &message);
        }
    }

    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::Trace, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    /// A blocking writer that logs each written line at `level`.
    pub fn writer(&self, level: Level) -> LineWriter {
        LineWriter::new(self.clone(), level)
    }

    fn emit(&self, level: Level, fields: &FieldSet, message: &dyn fmt::Display) {
        tracing::dispatcher::with_default(self.engine.dispatch(), || match level {
            Level::Trace => emit_at!(tracing::Level::TRACE, fields, message),
            Level::Debug => emit_at!(tracing::Level::DEBUG, fields, message),
            Level::Info => emit_at!(tracing::Level::INFO, fields, message),
            Level::Warn => emit_at!(tracing::Level::WARN, fields, message),
            Level::Error => emit_at!(tracing::Level::ERROR, fields, message),
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("fields", &*self.fields)
            .finish_non_exhaustive()
    }
}
