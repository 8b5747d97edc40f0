//! Integration tests for the context logger
//!
//! These tests verify:
//! - Threshold filtering and context overrides
//! - Level names and invalid names
//! - Trace id propagation
//! - Value rendering for composite values
//! - File output
//! - Timing line pairs

use ctx_logger_system::prelude::*;
use ctx_logger_system::{cost, debug, info, infof, warn};
use serde::Serialize;
use std::fs;
use tempfile::TempDir;

fn memory_logger(threshold: LogLevel) -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    (Logger::new(threshold, sink.clone()), sink)
}

/// Text after the `[timestamp] [file:function:line] ` part of a line.
fn after_caller(line: &str) -> &str {
    let caller_end = line[26..].find("] ").map(|i| 26 + i + 2).unwrap_or(line.len());
    &line[caller_end..]
}

#[test]
fn test_threshold_round_trip() {
    let (logger, sink) = memory_logger(LogLevel::Warn);
    let ctx = LogContext::new().with_trace_id(123131231);

    logger.set_threshold(LogLevel::Info);
    assert_eq!(logger.threshold(), LogLevel::Info);

    debug!(logger, ctx, "debug enabled");
    info!(logger, ctx, "info enabled", 5);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(after_caller(&lines[0]), "[INFO] [123131231] info enabled 5");
    assert_eq!(logger.count(LogLevel::Debug), 0);
    assert_eq!(logger.count(LogLevel::Info), 1);
}

#[test]
fn test_threshold_by_name() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    logger.set_threshold_by_name("dEbUg");
    assert_eq!(logger.threshold(), LogLevel::Debug);
    assert!(sink.contents().is_empty());

    logger.set_threshold_by_name("bogus");
    assert_eq!(logger.threshold(), LogLevel::Debug);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[ERROR] [-]"));
    assert!(lines[0].contains("bogus"));
    assert_eq!(logger.count(LogLevel::Error), 1);
}

#[test]
fn test_threshold_by_name_while_off() {
    let (logger, sink) = memory_logger(LogLevel::Off);

    logger.set_threshold_by_name("bogus");

    assert_eq!(logger.threshold(), LogLevel::Off);
    assert!(sink.contents().is_empty());
}

#[test]
fn test_context_override_is_per_request() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let base = LogContext::new().with_trace_id("req-1");
    let verbose = base.with_threshold(LogLevel::Trace);

    debug!(logger, base, "hidden");
    debug!(logger, verbose, "shown");

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(after_caller(&lines[0]), "[DEBUG] [req-1] shown");
    // The shared threshold was never touched
    assert_eq!(logger.threshold(), LogLevel::Info);
}

#[test]
fn test_trace_ids() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    let ctx = new_trace_id(None);
    let id = ctx.trace_id().expect("trace id generated").clone();
    assert_eq!(id.as_str().len(), 16);

    // Regenerating keeps the existing id
    let again = new_trace_id(Some(&ctx));
    assert_eq!(again.trace_id(), Some(&id));

    info!(logger, again, "with id");
    info!(logger, LogContext::new(), "without id");

    let lines = sink.lines();
    assert!(lines[0].contains(&format!("[INFO] [{}] with id", id)));
    assert!(lines[1].contains("[INFO] [-] without id"));
}

#[derive(Debug, Serialize)]
struct LoginEvent {
    user: String,
    attempts: u32,
}

#[test]
fn test_composite_values_render_as_json() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let event = LoginEvent {
        user: "alice".to_string(),
        attempts: 3,
    };

    info!(logger, LogContext::new(), "login", LogValue::structured(&event), 2.71828);

    let lines = sink.lines();
    assert_eq!(
        after_caller(&lines[0]),
        r#"[INFO] [-] login {"user":"alice","attempts":3} 2.72"#
    );
}

#[derive(Debug, Serialize)]
struct Measurement {
    zeta: u32,
    alpha: f64,
}

#[test]
fn test_composite_values_keep_declaration_order() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let ok = Measurement { zeta: 1, alpha: 2.0 };
    let broken = Measurement {
        zeta: 1,
        alpha: f64::NAN,
    };

    logger.info(&LogContext::new(), &[LogValue::structured(&ok)]);
    logger.info(&LogContext::new(), &[LogValue::structured(&broken)]);

    let lines = sink.lines();
    assert_eq!(after_caller(&lines[0]), r#"[INFO] [-] {"zeta":1,"alpha":2.0}"#);
    assert_eq!(after_caller(&lines[1]), "[INFO] [-] Measurement { zeta: 1, alpha: NaN }");
}

#[test]
fn test_templated_body() {
    let (logger, sink) = memory_logger(LogLevel::Info);

    infof!(logger, LogContext::new(), "{} of {} done", 3, 4);
    logger.warnf(&LogContext::new(), format_args!("pool {}% full", 90));

    let lines = sink.lines();
    assert_eq!(after_caller(&lines[0]), "[INFO] [-] 3 of 4 done");
    assert_eq!(after_caller(&lines[1]), "[WARN] [-] pool 90% full");
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::new(LogLevel::Info, FileSink::open(&log_file).expect("Failed to open sink"));
    let ctx = LogContext::new().with_trace_id("file-1");

    warn!(logger, ctx, "written", 1);
    logger.info(&ctx, &["written".into(), 2.into()]);

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("[WARN] [file-1] written 1"));
    assert!(lines[1].ends_with("[INFO] [file-1] written 2"));
}

#[test]
fn test_set_output_redirects() {
    let (logger, first) = memory_logger(LogLevel::Info);
    let second = MemorySink::new();

    info!(logger, LogContext::new(), "one");
    logger.set_output(second.clone());
    info!(logger, LogContext::new(), "two");

    assert_eq!(first.lines().len(), 1);
    assert_eq!(second.lines().len(), 1);
    assert!(second.contents().contains("two"));
    assert_eq!(logger.count(LogLevel::Info), 2);
}

#[test]
fn test_cost_pair() {
    let (logger, sink) = memory_logger(LogLevel::Info);
    let ctx = LogContext::new().with_trace_id("t");

    let token = cost!(logger, ctx, "load config");
    logger.finish(&token);

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(after_caller(&lines[0]), "[INFO] [t] load config start...");
    assert!(after_caller(&lines[1]).starts_with("[INFO] [t] load config cost "));
    assert_eq!(logger.count(LogLevel::Info), 2);
}

#[test]
fn test_counts_serialize() {
    let (logger, _sink) = memory_logger(LogLevel::Trace);
    let ctx = LogContext::new();

    logger.error(&ctx, &["e".into()]);
    logger.info(&ctx, &["i".into()]);
    logger.info(&ctx, &["i".into()]);

    let json = serde_json::to_value(logger.counts()).expect("counts serialize");
    assert_eq!(json["error"], 1);
    assert_eq!(json["info"], 2);
    assert_eq!(json["trace"], 0);
    assert!(json.get("off").is_none());
}

#[test]
fn test_install_after_first_use_fails() {
    let _ = default_logger();
    let result = ctx_logger_system::install(Logger::new(LogLevel::Debug, std::io::sink()));
    assert!(matches!(result, Err(LoggerError::AlreadyInitialized)));
}
