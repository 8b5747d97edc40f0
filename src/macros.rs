//! Logging macros.
//!
//! Each macro checks enablement before building its arguments and records
//! the enclosing function name in the line prefix.
//!
//! Positional macros convert every argument with `LogValue::from` and join
//! them with single spaces; the `f`-suffixed macros take `format!` syntax.
//!
//! # Examples
//!
//! ```
//! use ctx_logger_system::prelude::*;
//! use ctx_logger_system::{info, infof};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(LogLevel::Info, sink.clone());
//! let ctx = LogContext::new().with_trace_id(123131231);
//!
//! info!(logger, ctx, "info enabled", 5);
//! infof!(logger, ctx, "listening on port {}", 8080);
//!
//! assert!(sink.contents().contains("[INFO] [123131231] info enabled 5"));
//! ```

/// Positional emission at an explicit level.
///
/// # Examples
///
/// ```
/// # use ctx_logger_system::prelude::*;
/// # let logger = Logger::new(LogLevel::Info, std::io::sink());
/// # let ctx = LogContext::new();
/// use ctx_logger_system::log;
/// log!(logger, ctx, LogLevel::Warn, "disk usage", 93.5, "percent");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $ctx:expr, $level:expr $(, $arg:expr)* $(,)?) => {{
        let logger: &$crate::Logger = &$logger;
        let ctx: &$crate::LogContext = &$ctx;
        let level: $crate::LogLevel = $level;
        if logger.is_enabled(ctx, level) {
            logger.log_at(
                ctx,
                level,
                $crate::CallSite::with_function($crate::__function_path!()),
                $crate::Body::Positional(&[$($crate::LogValue::from($arg)),*]),
            );
        }
    }};
}

/// Templated emission at an explicit level.
///
/// # Examples
///
/// ```
/// # use ctx_logger_system::prelude::*;
/// # let logger = Logger::new(LogLevel::Info, std::io::sink());
/// # let ctx = LogContext::new();
/// use ctx_logger_system::logf;
/// logf!(logger, ctx, LogLevel::Error, "error code: {}", 500);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $ctx:expr, $level:expr, $($fmt:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let ctx: &$crate::LogContext = &$ctx;
        let level: $crate::LogLevel = $level;
        if logger.is_enabled(ctx, level) {
            logger.log_at(
                ctx,
                level,
                $crate::CallSite::with_function($crate::__function_path!()),
                $crate::Body::Templated(format_args!($($fmt)+)),
            );
        }
    }};
}

/// Log at `Stack`: the line is followed by a backtrace.
#[macro_export]
macro_rules! stack {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Stack $(, $arg)*)
    };
}

/// Log at `Fatal`: if enabled, the process exits after the line is flushed.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Fatal $(, $arg)*)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use ctx_logger_system::prelude::*;
/// # let logger = Logger::new(LogLevel::Info, std::io::sink());
/// # let ctx = LogContext::new();
/// use ctx_logger_system::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
/// error!(logger, ctx, "request failed:", LogValue::error(&err));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Error $(, $arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Warn $(, $arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Info $(, $arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Debug $(, $arg)*)
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Trace $(, $arg)*)
    };
}

#[macro_export]
macro_rules! stackf {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {
        $crate::logf!($logger, $ctx, $crate::LogLevel::Stack, $($fmt)+)
    };
}

#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {
        $crate::logf!($logger, $ctx, $crate::LogLevel::Fatal, $($fmt)+)
    };
}

#[macro_export]
macro_rules! errorf {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {
        $crate::logf!($logger, $ctx, $crate::LogLevel::Error, $($fmt)+)
    };
}

#[macro_export]
macro_rules! warnf {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {
        $crate::logf!($logger, $ctx, $crate::LogLevel::Warn, $($fmt)+)
    };
}

#[macro_export]
macro_rules! infof {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {
        $crate::logf!($logger, $ctx, $crate::LogLevel::Info, $($fmt)+)
    };
}

#[macro_export]
macro_rules! debugf {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {
        $crate::logf!($logger, $ctx, $crate::LogLevel::Debug, $($fmt)+)
    };
}

#[macro_export]
macro_rules! tracef {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {
        $crate::logf!($logger, $ctx, $crate::LogLevel::Trace, $($fmt)+)
    };
}

/// Start timing at `Info`; returns a [`CostToken`](crate::CostToken) to pass
/// to `Logger::finish`.
///
/// # Examples
///
/// ```
/// # use ctx_logger_system::prelude::*;
/// # let logger = Logger::new(LogLevel::Info, std::io::sink());
/// # let ctx = LogContext::new();
/// use ctx_logger_system::cost;
/// let token = cost!(logger, ctx, "load users");
/// // ... work ...
/// logger.finish(&token);
/// ```
#[macro_export]
macro_rules! cost {
    ($logger:expr, $ctx:expr $(, $arg:expr)* $(,)?) => {{
        let logger: &$crate::Logger = &$logger;
        let ctx: &$crate::LogContext = &$ctx;
        let label = logger.render_label(&[$($crate::LogValue::from($arg)),*]);
        logger.begin_cost(
            ctx,
            $crate::LogLevel::Info,
            $crate::CallSite::with_function($crate::__function_path!()),
            label,
        )
    }};
}

/// Start timing at `Info` with a `format!`-style label.
#[macro_export]
macro_rules! costf {
    ($logger:expr, $ctx:expr, $($fmt:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let ctx: &$crate::LogContext = &$ctx;
        let label = ::std::format!(" {}", format_args!($($fmt)+)).into_bytes();
        logger.begin_cost(
            ctx,
            $crate::LogLevel::Info,
            $crate::CallSite::with_function($crate::__function_path!()),
            label,
        )
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::{LogContext, LogLevel, LogValue, Logger};
    use crate::sinks::MemorySink;
    use serde::Serialize;

    fn memory_logger(threshold: LogLevel) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        (Logger::new(threshold, sink.clone()), sink)
    }

    #[test]
    fn test_log_macro() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        let ctx = LogContext::new();
        log!(logger, ctx, LogLevel::Info, "Test message");
        log!(logger, &ctx, LogLevel::Info, "Formatted:", 42, true);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("[INFO] [-] Formatted: 42 true"));
    }

    #[test]
    fn test_macro_records_function_name() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        let ctx = LogContext::new();
        info!(logger, ctx, "here");
        let line = line!() - 1;

        assert!(sink
            .contents()
            .contains(&format!("[src/macros:test_macro_records_function_name:{}] [INFO]", line)));
    }

    #[test]
    fn test_function_name_inside_closure() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        let ctx = LogContext::new();
        let run = || warn!(logger, ctx, "from closure");
        run();

        assert!(sink.contents().contains(":test_function_name_inside_closure:"));
    }

    #[test]
    fn test_disabled_macro_skips_arguments() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        let ctx = LogContext::new();
        let mut evaluated = false;
        debug!(logger, ctx, {
            evaluated = true;
            "expensive"
        });

        assert!(!evaluated);
        assert!(sink.contents().is_empty());
        assert_eq!(logger.count(LogLevel::Debug), 0);
    }

    #[test]
    fn test_level_macros() {
        let (logger, sink) = memory_logger(LogLevel::Trace);
        let ctx = LogContext::new().with_trace_id("abc");
        error!(logger, ctx, "e");
        warn!(logger, ctx, "w");
        info!(logger, ctx, "i");
        debug!(logger, ctx, "d");
        trace!(logger, ctx, "t");

        let lines = sink.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("[ERROR] [abc] e"));
        assert!(lines[4].ends_with("[TRACE] [abc] t"));
        assert_eq!(logger.counts().total(), 5);
    }

    #[test]
    fn test_format_macros() {
        let (logger, sink) = memory_logger(LogLevel::Trace);
        let ctx = LogContext::new();
        errorf!(logger, ctx, "code {}", 500);
        warnf!(logger, ctx, "retry {} of {}", 1, 3);
        infof!(logger, ctx, "items: {}", 100);
        debugf!(logger, ctx, "{:?}", vec![1, 2]);
        tracef!(logger, ctx, "plain");

        let lines = sink.lines();
        assert!(lines[0].ends_with("[ERROR] [-] code 500"));
        assert!(lines[1].ends_with("[WARN] [-] retry 1 of 3"));
        assert!(lines[2].ends_with("[INFO] [-] items: 100"));
        assert!(lines[3].ends_with("[DEBUG] [-] [1, 2]"));
        assert!(lines[4].ends_with("[TRACE] [-] plain"));
    }

    #[test]
    fn test_stack_macros() {
        let (logger, sink) = memory_logger(LogLevel::Stack);
        let ctx = LogContext::new();
        stack!(logger, ctx, "dump", 1);
        stackf!(logger, ctx, "dump {}", 2);

        assert_eq!(logger.count(LogLevel::Stack), 2);
        assert!(sink.contents().contains("[STACK] [-] dump 1\n"));
        assert!(sink.contents().contains("[STACK] [-] dump 2\n"));
    }

    #[test]
    fn test_structured_argument() {
        #[derive(Debug, Serialize)]
        struct Order {
            id: u64,
            total: f64,
        }

        let (logger, sink) = memory_logger(LogLevel::Info);
        let order = Order { id: 9, total: 12.5 };
        info!(logger, LogContext::new(), "order", LogValue::structured(&order));

        assert!(sink.contents().contains(r#"order {"id":9,"total":12.5}"#));
    }

    #[test]
    fn test_cost_macros() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        let ctx = LogContext::new();

        let token = cost!(logger, ctx, "method1");
        logger.finish(&token);
        let token = costf!(logger, ctx, "method{}", 2);
        logger.finish(&token);

        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(":test_cost_macros:"));
        assert!(lines[0].ends_with("[INFO] [-] method1 start..."));
        assert!(lines[1].contains(":test_cost_macros:"));
        assert!(lines[1].contains("method1 cost "));
        assert!(lines[2].ends_with("method2 start..."));
        assert!(lines[3].contains("method2 cost "));
    }
}
