//! The structured logging engine shared by every handle of a runtime.
//!
//! Each engine owns its own `tracing` dispatcher instead of installing a
//! global default, so several runtimes can live in one process.

use std::fmt;

use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, Registry};

use crate::logger::format::{Format, FormatSwitch, RecordFormat};
use crate::logger::Level;

/// Target used for every record emitted through a [`crate::Logger`].
pub const TARGET: &str = "proxy_log";

pub(crate) struct Engine {
    dispatch: Dispatch,
    level: reload::Handle<LevelFilter, Registry>,
    format: FormatSwitch,
}

impl Engine {
    pub(crate) fn new<W>(level: Level, format: Format, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let (filter, handle) = reload::Layer::new(level.as_filter());
        let format = FormatSwitch::new(format);

        let subscriber = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(RecordFormat::new(format.clone()))
                .with_writer(writer),
        );

        Self {
            dispatch: Dispatch::new(subscriber),
            level: handle,
            format,
        }
    }

    pub(crate) fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub(crate) fn level(&self) -> Level {
        self.level
            .with_current(|filter| Level::from_filter(*filter))
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub(crate) fn set_level(&self, level: Level) {
        if let Err(e) = self.level.reload(level.as_filter()) {
            // Only fails once the subscriber is gone, which the engine prevents.
            eprintln!("proxy-log: failed to set level: {}", e);
        }
    }

    pub(crate) fn format(&self) -> Format {
        self.format.get()
    }

    pub(crate) fn set_format(&self, format: Format) {
        self.format.set(format);
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("level", &self.level())
            .field("format", &self.format())
            .finish_non_exhaustive()
    }
}
