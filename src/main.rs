//! proxy-log
//!
//! Tees lines from stdin into the structured logging pipeline: records go
//! to stdout and, when configured, to a log file that is reopened on
//! SIGUSR1 and uploaded to object storage on a fixed interval.
//!
//! ```text
//!  stdin ──▶ LineWriter ──▶ Logger ──▶ engine ──▶ stdout
//!                                         └─────▶ log file ──(interval)──▶ object store
//!
//!  SIGUSR1 ──▶ rotate_file      config change ──▶ level/format reload
//!  SIGINT/SIGTERM ──▶ stop upload, close file
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::{mpsc, oneshot};

use proxy_log::config::{load_config, ConfigWatcher, LogConfig, UploadConfig};
use proxy_log::lifecycle::{SignalEvent, Signals};
use proxy_log::upload::{ObjectStore, S3ObjectStore};
use proxy_log::{fields, Level, LogRuntime, UploadTask};

#[derive(Parser)]
#[command(name = "proxy-log")]
#[command(about = "Tee stdin into structured logs with file rotation and upload", long_about = None)]
struct Cli {
    /// TOML configuration file; watched for level and format changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path, overriding the configuration.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Minimum level, overriding the configuration.
    #[arg(short, long)]
    level: Option<Level>,

    /// Level at which stdin lines are logged.
    #[arg(long, default_value = "info")]
    input_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LogConfig::default(),
    };
    if let Some(file) = cli.file.clone() {
        config.log.file_path = Some(file);
    }
    if let Some(level) = cli.level {
        config.log.level = level;
    }

    let runtime = LogRuntime::from_config(&config.log);
    let logger = runtime.without_context();
    logger.info(format!("proxy-log v{} starting", env!("CARGO_PKG_VERSION")));

    if let Some(path) = &config.log.file_path {
        if let Err(e) = runtime.open_file(path) {
            logger.error(e);
        }
    }

    let upload = match &config.log.file_path {
        Some(path) if config.upload.enabled => start_upload(&runtime, &config.upload, path).await,
        _ => None,
    };

    let (_watcher, mut config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, logger.derive([fields::str("component", "config")]));
            (Some(watcher.run()?), updates)
        }
        None => (None, mpsc::unbounded_channel().1),
    };

    let mut signals = Signals::new()?;
    let mut input = spawn_input_pump(runtime.clone(), cli.input_level);

    loop {
        tokio::select! {
            event = signals.recv() => match event {
                SignalEvent::Rotate => {
                    if let Err(e) = runtime.rotate_file() {
                        logger.error(e);
                    }
                }
                SignalEvent::Shutdown => {
                    logger.info("Shutdown signal received");
                    break;
                }
            },
            Some(new_config) = config_updates.recv() => runtime.apply(&new_config),
            result = &mut input => {
                if let Ok(Err(e)) = result {
                    logger.error(format!("error reading stdin: {}", e));
                }
                break;
            }
        }
    }

    if let Some(task) = upload {
        task.stop().await;
    }
    logger.info("Shutdown complete");
    runtime.close_file()?;
    Ok(())
}

async fn start_upload(runtime: &LogRuntime, config: &UploadConfig, path: &Path) -> Option<UploadTask> {
    let store: Arc<dyn ObjectStore> =
        Arc::new(S3ObjectStore::from_env(&config.region, config.endpoint.as_deref()).await);

    runtime
        .uploader(store)
        .with_interval(Duration::from_secs(config.interval_secs))
        .start(path)
}

/// Copy stdin into the log on a plain thread, so a blocked read never holds
/// up process exit.
fn spawn_input_pump(runtime: LogRuntime, level: Level) -> oneshot::Receiver<io::Result<u64>> {
    let (done_tx, done_rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut writer = runtime.writer(level);
        let result = io::copy(&mut io::stdin().lock(), &mut writer);
        drop(writer);
        let _ = done_tx.send(result);
    });
    done_rx
}
