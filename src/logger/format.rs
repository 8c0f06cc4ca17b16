//! Record formatting.
//!
//! Records carry their message plus a `logger.fields` value holding the logger's
//! field set as a JSON object. The formatter flattens those fields into the
//! record so that text and JSON output both show them as top-level keys.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::logger::fields::write_logfmt_value;
use crate::logger::Level;

/// Name of the event field that carries encoded logger fields.
pub(crate) const FIELDS_KEY: &str = "logger.fields";

/// Output format of rendered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `time=... level=info msg="..." key=value`
    #[default]
    Text,
    /// `{"time":"...","level":"info","msg":"...","key":"value"}`
    Json,
}

impl Format {
    fn to_u8(self) -> u8 {
        match self {
            Format::Text => 0,
            Format::Json => 1,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => Format::Json,
            _ => Format::Text,
        }
    }
}

/// Runtime-switchable format selector shared by every handle of a runtime.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormatSwitch(Arc<AtomicU8>);

impl FormatSwitch {
    pub(crate) fn new(format: Format) -> Self {
        Self(Arc::new(AtomicU8::new(format.to_u8())))
    }

    pub(crate) fn get(&self) -> Format {
        Format::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, format: Format) {
        self.0.store(format.to_u8(), Ordering::Relaxed);
    }
}

/// Event formatter installed on the runtime's fmt layer.
pub(crate) struct RecordFormat {
    format: FormatSwitch,
}

impl RecordFormat {
    pub(crate) fn new(format: FormatSwitch) -> Self {
        Self { format }
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: Map<String, Value>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            FIELDS_KEY => self.merge_encoded(value),
            name => {
                self.fields.insert(name.to_string(), Value::String(value.to_string()));
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        self.record_str(field, &rendered);
    }
}

impl RecordVisitor {
    fn merge_encoded(&mut self, encoded: &str) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(encoded) {
            for (k, v) in map {
                self.fields.insert(k, v);
            }
        }
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let time = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let level = Level::from(*event.metadata().level());

        match self.format.get() {
            Format::Text => {
                write!(writer, "time=\"{}\" level={} msg=", time, level)?;
                write_logfmt_value(&mut writer, &visitor.message)?;
                for (k, v) in &visitor.fields {
                    write!(writer, " {}=", k)?;
                    match v {
                        Value::String(s) => write_logfmt_value(&mut writer, s)?,
                        other => write!(writer, "{}", other)?,
                    }
                }
                writeln!(writer)
            }
            Format::Json => {
                let mut record = Map::new();
                record.insert("time".into(), Value::String(time));
                record.insert("level".into(), Value::String(level.to_string()));
                record.insert("msg".into(), Value::String(visitor.message));
                for (k, v) in visitor.fields {
                    record.entry(k).or_insert(v);
                }
                let line = serde_json::to_string(&Value::Object(record)).map_err(|_| fmt::Error)?;
                writeln!(writer, "{}", line)
            }
        }
    }
}
