//! Request-scoped logging context
//!
//! This module provides:
//! - `LogContext`: immutable per-request attachments (threshold override,
//!   trace id) threaded explicitly through call chains
//! - `TraceId`: the correlation id printed on every line

use super::log_level::LogLevel;
use std::fmt;
use std::sync::Arc;

/// Marker printed when a context carries no trace id.
pub const NO_TRACE_ID: &str = "-";

/// Opaque correlation id shared by every line of one logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(Arc<str>);

impl TraceId {
    /// Fresh random id: 16 lowercase hex digits.
    pub fn generate() -> Self {
        TraceId(format!("{:016x}", rand::random::<u64>()).into())
    }

    /// Build an id from anything with a textual form.
    pub fn display(value: &impl fmt::Display) -> Self {
        TraceId(value.to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraceId {
    fn from(s: &str) -> Self {
        TraceId(s.into())
    }
}

impl From<String> for TraceId {
    fn from(s: String) -> Self {
        TraceId(s.into())
    }
}

impl From<&String> for TraceId {
    fn from(s: &String) -> Self {
        TraceId(s.as_str().into())
    }
}

macro_rules! impl_trace_id_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for TraceId {
            fn from(v: $t) -> Self {
                TraceId(v.to_string().into())
            }
        })*
    };
}

impl_trace_id_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Immutable logging context.
///
/// Every `with_*` method returns a derived context and leaves the receiver
/// untouched, so a context can be shared freely between threads and handed
/// down a call chain.
///
/// # Example
///
/// ```
/// use ctx_logger_system::{LogContext, LogLevel};
///
/// let root = LogContext::new().with_trace_id(42u64);
/// let verbose = root.with_threshold(LogLevel::Debug);
///
/// assert_eq!(root.threshold(), None);
/// assert_eq!(verbose.threshold(), Some(LogLevel::Debug));
/// assert_eq!(verbose.trace_id_or_dash(), "42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    threshold: Option<LogLevel>,
    trace_id: Option<TraceId>,
}

impl LogContext {
    /// Root context: no override, no trace id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context whose enablement checks use `level` instead of the
    /// logger's threshold.
    #[must_use]
    pub fn with_threshold(&self, level: LogLevel) -> Self {
        Self {
            threshold: Some(level),
            ..self.clone()
        }
    }

    /// Derive a context that falls back to the logger's threshold.
    #[must_use]
    pub fn without_threshold(&self) -> Self {
        Self {
            threshold: None,
            ..self.clone()
        }
    }

    /// Derive a context carrying `trace_id`, replacing any existing one.
    #[must_use]
    pub fn with_trace_id(&self, trace_id: impl Into<TraceId>) -> Self {
        Self {
            trace_id: Some(trace_id.into()),
            ..self.clone()
        }
    }

    /// Derive a context with a freshly generated trace id, unless one is
    /// already attached, in which case the context is returned unchanged.
    #[must_use]
    pub fn new_trace_id(&self) -> Self {
        if self.trace_id.is_some() {
            return self.clone();
        }
        self.with_trace_id(TraceId::generate())
    }

    pub fn threshold(&self) -> Option<LogLevel> {
        self.threshold
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Trace id as printed on a log line.
    pub fn trace_id_or_dash(&self) -> &str {
        self.trace_id.as_ref().map_or(NO_TRACE_ID, TraceId::as_str)
    }
}

/// Attach a generated trace id to `ctx`, or to a root context when `ctx` is
/// `None`. Existing ids are kept.
pub fn new_trace_id(ctx: Option<&LogContext>) -> LogContext {
    match ctx {
        Some(ctx) => ctx.new_trace_id(),
        None => LogContext::new().new_trace_id(),
    }
}
