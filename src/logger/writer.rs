//! Adapts plain byte writers into the logging pipeline.

use std::io;

use crate::logger::{Level, Logger};

/// A [`io::Write`] that emits one record per line at a fixed level.
///
/// Bytes are buffered until a newline arrives. A trailing partial line is
/// emitted on [`io::Write::flush`] or when the writer is dropped. Blank
/// lines are skipped.
#[derive(Debug)]
pub struct LineWriter {
    logger: Logger,
    level: Level,
    pending: Vec<u8>,
}

impl LineWriter {
    pub(crate) fn new(logger: Logger, level: Level) -> Self {
        Self {
            logger,
            level,
            pending: Vec::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    fn emit_line(&self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.iter().all(u8::is_ascii_whitespace) {
            return;
        }
        self.logger.log(self.level, String::from_utf8_lossy(line));
    }
}

impl io::Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit_line(&line[..line.len() - 1]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
