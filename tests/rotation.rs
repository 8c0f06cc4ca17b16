//! File output and rotation through the runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use proxy_log::{fields, LogRuntime};

mod common;

#[test]
fn test_rotate_without_file_is_noop() {
    let runtime = LogRuntime::new();
    runtime.rotate_file().unwrap();
    assert!(!runtime.output().has_file());
    assert!(runtime.output().path().is_none());
}

#[test]
fn test_empty_path_means_no_file_backing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.log");
    let runtime = LogRuntime::new();
    let logger = runtime.without_context();

    runtime.open_file(&path).unwrap();
    logger.info("before");
    runtime.open_file("").unwrap();
    logger.info("after");

    assert!(runtime.output().path().is_none());
    assert!(!runtime.output().has_file());
    runtime.rotate_file().unwrap();
    assert!(!runtime.output().has_file());

    let lines = common::read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("msg=before"));
}

#[test]
fn test_records_survive_rotation_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.log");
    let runtime = LogRuntime::new();
    let logger = runtime.without_context();

    runtime.open_file(&path).unwrap();
    logger.info("hello");
    runtime.rotate_file().unwrap();
    logger.info("world");

    let lines = common::read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("msg=hello"));
    assert!(lines[1].contains("msg=world"));
}

#[test]
fn test_rotation_after_external_rename() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.log");
    let rotated = dir.path().join("t.log.1");
    let runtime = LogRuntime::new();
    let logger = runtime.without_context();

    runtime.open_file(&path).unwrap();
    logger.info("L1");
    std::fs::rename(&path, &rotated).unwrap();
    runtime.rotate_file().unwrap();
    logger.info("L2");

    let old = common::read_lines(&rotated);
    let new = common::read_lines(&path);
    assert_eq!(old.len(), 1);
    assert!(old[0].contains("msg=L1"));
    assert_eq!(new.len(), 1);
    assert!(new[0].contains("msg=L2"));
}

#[test]
fn test_close_returns_to_console() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.log");
    let runtime = LogRuntime::new();

    runtime.open_file(&path).unwrap();
    runtime.without_context().info("kept");
    runtime.close_file().unwrap();
    runtime.without_context().info("console only");
    runtime.close_file().unwrap();

    let lines = common::read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("msg=kept"));
}

#[test]
fn test_failed_open_keeps_logging() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("missing").join("t.log");
    let runtime = LogRuntime::new();

    assert!(runtime.open_file(&bad).is_err());
    assert_eq!(runtime.output().path(), Some(bad.clone()));
    runtime.without_context().info("still logging");

    std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
    runtime.rotate_file().unwrap();
    runtime.without_context().info("recovered");

    let lines = common::read_lines(&bad);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("msg=recovered"));
}

#[test]
fn test_concurrent_writers_during_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.log");
    let rotated = dir.path().join("t.log.1");
    let runtime = LogRuntime::new();
    runtime.open_file(&path).unwrap();

    let running = Arc::new(AtomicBool::new(true));
    let writers: Vec<_> = (0..4)
        .map(|i| {
            let logger = runtime
                .without_context()
                .derive([fields::str("writer", i.to_string())]);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let mut written = 0usize;
                while running.load(Ordering::Relaxed) || written < 50 {
                    logger.info("tick");
                    written += 1;
                }
                written
            })
        })
        .collect();

    for _ in 0..20 {
        runtime.rotate_file().unwrap();
    }
    std::fs::rename(&path, &rotated).unwrap();
    runtime.rotate_file().unwrap();
    running.store(false, Ordering::Relaxed);

    let total: usize = writers.into_iter().map(|w| w.join().unwrap()).sum();
    let lines = common::read_lines(&rotated).len() + common::read_lines(&path).len();

    assert_eq!(lines, total);
}
