//! Basic usage of the context logger
//!
//! Run with: cargo run --example basic_usage

use ctx_logger_system::prelude::*;
use ctx_logger_system::{cost, debug, error, info, infof, warn};
use serde::Serialize;
use std::thread;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Order {
    id: u64,
    items: Vec<&'static str>,
    total: f64,
}

fn handle_request(logger: &Logger, ctx: &LogContext, order: &Order) {
    let token = cost!(logger, ctx, "handle order", order.id);

    info!(logger, ctx, "received", LogValue::structured(order));
    debug!(logger, ctx, "only printed for verbose requests");
    thread::sleep(Duration::from_millis(15));

    if order.total > 100.0 {
        warn!(logger, ctx, "large order total", order.total);
    }

    logger.finish(&token);
}

fn main() -> Result<()> {
    println!("=== Context Logger Demo ===\n");

    let logger = Logger::builder()
        .threshold(LogLevel::Info)
        .output(ConsoleSink::stdout())
        .build();

    // 1. Plain emission without a trace id
    let root = LogContext::new();
    info!(logger, root, "service starting on port", 8080);
    infof!(logger, root, "{} workers ready", 4);

    // 2. Per-request trace ids
    let order = Order {
        id: 42,
        items: vec!["book", "lamp"],
        total: 129.5,
    };
    let ctx = new_trace_id(Some(&root));
    handle_request(&logger, &ctx, &order);

    // 3. A verbose request sees debug lines without changing the shared threshold
    let verbose = ctx.with_threshold(LogLevel::Debug);
    handle_request(&logger, &verbose, &order);

    // 4. Errors render their message
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    error!(logger, ctx, "startup check failed:", LogValue::error(&err));

    // 5. Invalid level names are reported, not applied
    logger.set_threshold_by_name("loud");
    logger.set_threshold_by_name("warn");
    info!(logger, root, "hidden at warn");

    logger.flush()?;
    println!("\nCounts: {}", serde_json::to_string(&logger.counts())?);

    Ok(())
}
