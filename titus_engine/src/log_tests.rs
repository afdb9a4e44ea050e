use super::*;
use serial_test::serial;
use std::sync::{Arc, Mutex};

/// Logger that records every entry it receives
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn install_capture_logger() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    set_logger(Box::new(CaptureLogger {
        entries: Arc::clone(&entries),
    }));
    entries
}

#[test]
fn test_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
#[serial]
fn test_custom_logger_receives_entries() {
    let entries = install_capture_logger();
    set_min_severity(LogSeverity::Trace);

    crate::engine_info!("titus::test", "hello {}", 42);
    crate::engine_error!("titus::test", "boom");

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].severity, LogSeverity::Info);
    assert_eq!(entries[0].source, "titus::test");
    assert_eq!(entries[0].message, "hello 42");
    assert_eq!(entries[1].severity, LogSeverity::Error);
    assert!(entries[1].file.is_some());
    assert!(entries[1].line.is_some());

    drop(entries);
    set_logger(Box::new(DefaultLogger));
}

#[test]
#[serial]
fn test_min_severity_filters_entries() {
    let entries = install_capture_logger();
    set_min_severity(LogSeverity::Warn);

    crate::engine_debug!("titus::test", "dropped");
    crate::engine_warn!("titus::test", "kept");

    {
        let entries = entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
    }

    set_min_severity(LogSeverity::Debug);
    set_logger(Box::new(DefaultLogger));
}

#[test]
#[serial]
fn test_engine_err_produces_backend_error() {
    let _entries = install_capture_logger();
    set_min_severity(LogSeverity::Trace);

    let err = crate::engine_err!("titus::test", "failed with code {}", -3);
    match err {
        crate::Error::Backend(msg) => assert_eq!(msg, "failed with code -3"),
        other => panic!("expected Backend error, got {:?}", other),
    }

    set_logger(Box::new(DefaultLogger));
}
