//! The shared write sink used by the logging engine.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing_subscriber::fmt::MakeWriter;

/// Console output plus an optional file that can be swapped atomically
/// while writers are active.
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    file: Arc<ArcSwapOption<File>>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tee subsequent writes to `file`, returning the previous file.
    pub(crate) fn tee_to(&self, file: Arc<File>) -> Option<Arc<File>> {
        self.file.swap(Some(file))
    }

    /// Write to the console only, returning the previous file.
    pub(crate) fn console_only(&self) -> Option<Arc<File>> {
        self.file.swap(None)
    }

    pub fn is_file_backed(&self) -> bool {
        self.file.load().is_some()
    }

    /// A writer bound to the file current at the time of the call.
    pub fn writer(&self) -> TeeWriter {
        TeeWriter {
            file: self.file.load_full(),
        }
    }
}

impl<'a> MakeWriter<'a> for OutputSink {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer()
    }
}

/// Writes every buffer to stdout and, when present, to the file.
///
/// Holding a `TeeWriter` keeps its file open even if the sink is rotated in
/// the meantime; the write lands on the pre-rotation handle.
#[derive(Debug)]
pub struct TeeWriter {
    file: Option<Arc<File>>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = io::stdout().lock().write_all(buf);
        if let Some(file) = &self.file {
            (&**file).write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stdout().flush();
        if let Some(file) = &self.file {
            (&**file).flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;

    #[test]
    fn test_writer_keeps_pre_swap_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        let open = |p: &std::path::Path| {
            Arc::new(OpenOptions::new().create(true).append(true).open(p).unwrap())
        };

        let sink = OutputSink::new();
        assert!(!sink.is_file_backed());
        sink.tee_to(open(&first));

        let mut in_flight = sink.writer();
        let previous = sink.tee_to(open(&second));
        assert!(previous.is_some());
        drop(previous);

        in_flight.write_all(b"old\n").unwrap();
        sink.writer().write_all(b"new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&first).unwrap(), "old\n");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "new\n");
    }

    #[test]
    fn test_console_only_writer_never_fails() {
        let sink = OutputSink::new();
        let mut writer = sink.writer();
        writer.write_all(b"console\n").unwrap();
        writer.flush().unwrap();
        assert!(sink.console_only().is_none());
    }
}
