//! # Context Logger System
//!
//! A synchronous, leveled logging core for embedding in applications.
//!
//! ## Features
//!
//! - **Context overrides**: a request context can raise or lower the
//!   threshold for its own calls without touching shared state
//! - **Trace ids**: every line carries the request's trace id, or `-`
//! - **Value formatting**: primitives, errors, bytes, `Display` values and
//!   JSON-encoded composites
//! - **Counters**: per-level emission counts
//! - **Timing**: start/elapsed line pairs
//! - **Thread safe**: whole lines, no lost counter updates
//!
//! Line format:
//!
//! ```text
//! [2025-01-08 10:30:45.123] [src/main:handle:42] [INFO] [3f2a9c0d1b4e5f60] user 7 logged in
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        default_logger, new_trace_id, BacktraceResolver, Body, CallSite, Caller, CallerResolver,
        CostToken, JsonEncoder, LevelCounts, LogContext, LogLevel, LogValue, Logger, LoggerBuilder,
        LoggerError, Result, SourceResolver, TimeZoneChoice, TraceId, ValueEncoder,
        FATAL_EXIT_CODE,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink};
}

pub use crate::core::global::{
    count, count_all, is_enabled, set_output, set_threshold, set_threshold_by_name, threshold,
};
pub use crate::core::{
    default_logger, install, new_trace_id, BacktraceResolver, Body, CallSite, Caller,
    CallerResolver, CostToken, JsonEncoder, LevelCounts, LogContext, LogLevel, LogValue, Logger,
    LoggerBuilder, LoggerError, Result, SourceResolver, Structured, TimeZoneChoice, TraceId,
    ValueEncoder, FATAL_EXIT_CODE, NO_TRACE_ID,
};
pub use sinks::{ConsoleSink, ConsoleTarget, FileSink, MemorySink};
