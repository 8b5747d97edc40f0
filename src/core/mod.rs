//! Core logger types and traits

pub mod caller;
pub mod error;
mod finite;
pub mod global;
pub mod log_context;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;
pub mod timing;
pub mod value;

pub use caller::{BacktraceResolver, CallSite, Caller, CallerResolver, SourceResolver};
pub use error::{LoggerError, Result};
pub use global::{default_logger, install};
pub use log_context::{new_trace_id, LogContext, TraceId, NO_TRACE_ID};
pub use log_level::LogLevel;
pub use logger::{Body, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::LevelCounts;
pub use timestamp::TimeZoneChoice;
pub use timing::CostToken;
pub use value::{JsonEncoder, LogValue, Structured, ValueEncoder};
