//! OS signal handling.
//!
//! - SIGUSR1: reopen the log file (sent by an external rotator)
//! - SIGINT / SIGTERM: shut down

use tokio::signal::unix::{signal, SignalKind};

/// What a received signal asks the process to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Rotate,
    Shutdown,
}

/// Listens for the signals the process reacts to.
pub struct Signals {
    rotate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

impl Signals {
    /// Install the handlers. Must be called within a Tokio runtime.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            rotate: signal(SignalKind::user_defined1())?,
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next signal of interest.
    pub async fn recv(&mut self) -> SignalEvent {
        tokio::select! {
            _ = self.rotate.recv() => SignalEvent::Rotate,
            _ = self.interrupt.recv() => SignalEvent::Shutdown,
            _ = self.terminate.recv() => SignalEvent::Shutdown,
        }
    }
}
