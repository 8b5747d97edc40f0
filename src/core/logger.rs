//! Main logger implementation

use super::{
    caller::{CallSite, Caller, CallerResolver, SourceResolver},
    error::{LoggerError, Result},
    log_context::LogContext,
    log_level::LogLevel,
    metrics::LevelCounts,
    timestamp::TimeZoneChoice,
    value::{render_positional, JsonEncoder, LogValue, ValueEncoder},
};
use parking_lot::{Mutex, RwLock};
use std::backtrace::Backtrace;
use std::fmt;
use std::io::{BufWriter, Write};
use std::sync::Arc;

/// Exit status used when a `Fatal` line has been written.
pub const FATAL_EXIT_CODE: i32 = 99;

type Sink = BufWriter<Box<dyn Write + Send>>;

/// Body of one log line.
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    /// Each value rendered on its own, preceded by a single space.
    Positional(&'a [LogValue<'a>]),
    /// One space followed by the expanded format arguments.
    Templated(fmt::Arguments<'a>),
    /// Bytes appended verbatim, leading space included.
    Raw(&'a [u8]),
}

struct LoggerState {
    threshold: LogLevel,
    // Only reached through the write guard, via `get_mut`.
    sink: Mutex<Sink>,
    counts: LevelCounts,
}

/// Synchronous leveled logger.
///
/// Threshold, sink and counters share one `RwLock`: enablement checks and
/// counter reads take the read side, mutators and emissions the write side.
/// Lines are fully formatted before the lock is taken, so concurrent
/// emissions interleave as whole lines.
pub struct Logger {
    state: RwLock<LoggerState>,
    resolver: Arc<dyn CallerResolver>,
    encoder: Arc<dyn ValueEncoder>,
    time_zone: TimeZoneChoice,
}

impl Logger {
    /// Create a logger with the given threshold writing to `writer`.
    #[must_use]
    pub fn new<W: Write + Send + 'static>(threshold: LogLevel, writer: W) -> Self {
        Self::builder().threshold(threshold).output(writer).build()
    }

    pub fn threshold(&self) -> LogLevel {
        self.state.read().threshold
    }

    pub fn set_threshold(&self, level: LogLevel) {
        self.state.write().threshold = level;
    }

    /// Set the threshold from a case-insensitive level name.
    ///
    /// An unknown name leaves the threshold unchanged and is reported as one
    /// `Error` line through this logger.
    #[track_caller]
    pub fn set_threshold_by_name(&self, name: &str) {
        match LogLevel::parse(name) {
            Some(level) => self.set_threshold(level),
            None => {
                let err = LoggerError::unknown_level(name);
                self.errorf(&LogContext::new(), format_args!("{}", err));
            }
        }
    }

    /// Replace the output sink.
    pub fn set_output<W: Write + Send + 'static>(&self, writer: W) {
        let mut state = self.state.write();
        let old = std::mem::replace(state.sink.get_mut(), BufWriter::new(Box::new(writer)));
        drop(state);
        // Emissions flush as they go; this only catches writes made elsewhere.
        if let Err(e) = old.into_inner().map(drop) {
            eprintln!("[LOGGER ERROR] Failed to flush replaced sink: {}", e.error());
        }
    }

    /// Whether `level` would be emitted for `ctx`.
    ///
    /// The context's threshold override wins over the logger's threshold.
    #[inline]
    pub fn is_enabled(&self, ctx: &LogContext, level: LogLevel) -> bool {
        let effective = match ctx.threshold() {
            Some(special) => special,
            None => self.state.read().threshold,
        };
        effective.allows(level)
    }

    /// Number of lines emitted at `level` so far.
    pub fn count(&self, level: LogLevel) -> u64 {
        self.state.read().counts.get(level)
    }

    pub fn count_all(&self) -> [u64; LogLevel::COUNT] {
        self.state.read().counts.as_array()
    }

    /// Snapshot of all counters.
    pub fn counts(&self) -> LevelCounts {
        self.state.read().counts
    }

    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.write();
        state.sink.get_mut().flush()?;
        Ok(())
    }

    pub(crate) fn encoder(&self) -> &dyn ValueEncoder {
        self.encoder.as_ref()
    }

    /// Emit at `level` if enabled for `ctx`.
    ///
    /// This is the entry point used by the macros; the per-level methods
    /// capture the call site themselves.
    pub fn log_at(&self, ctx: &LogContext, level: LogLevel, site: CallSite, body: Body<'_>) {
        if !self.is_enabled(ctx, level) {
            return;
        }
        self.emit(ctx, level, &site, body);
    }

    #[track_caller]
    #[inline]
    pub fn log(&self, ctx: &LogContext, level: LogLevel, args: &[LogValue<'_>]) {
        self.log_at(ctx, level, CallSite::here(), Body::Positional(args));
    }

    #[track_caller]
    #[inline]
    pub fn logf(&self, ctx: &LogContext, level: LogLevel, args: fmt::Arguments<'_>) {
        self.log_at(ctx, level, CallSite::here(), Body::Templated(args));
    }

    fn emit(&self, ctx: &LogContext, level: LogLevel, site: &CallSite, body: Body<'_>) {
        let caller = self.resolver.resolve(site).unwrap_or_else(Caller::unknown);

        let mut line = Vec::with_capacity(256);
        self.write_prefix(&mut line, level, &caller, ctx);
        match body {
            Body::Positional(values) => render_positional(values, &mut line, self.encoder()),
            Body::Templated(args) => {
                line.push(b' ');
                let _ = line.write_fmt(args);
            }
            Body::Raw(bytes) => line.extend_from_slice(bytes),
        }
        line.push(b'\n');

        if level == LogLevel::Stack {
            let _ = write!(line, "{}", Backtrace::force_capture());
            line.push(b'\n');
        }

        {
            let mut state = self.state.write();
            let sink = state.sink.get_mut();
            if let Err(e) = sink.write_all(&line).and_then(|()| sink.flush()) {
                eprintln!("[LOGGER ERROR] Failed to write {} line: {}", level, e);
            }
            state.counts.record(level);
        }

        if level == LogLevel::Fatal {
            std::process::exit(FATAL_EXIT_CODE);
        }
    }

    /// `[timestamp] [file:function:line] [LEVEL] [trace-id]`
    fn write_prefix(&self, line: &mut Vec<u8>, level: LogLevel, caller: &Caller, ctx: &LogContext) {
        let _ = write!(
            line,
            "[{}] [{}:{}:{}] [{}] [{}]",
            self.time_zone.now(),
            caller.file,
            caller.function,
            caller.line,
            level.to_str(),
            ctx.trace_id_or_dash()
        );
    }

    /// Positional emission at `Stack`, followed by a backtrace.
    #[track_caller]
    #[inline]
    pub fn stack(&self, ctx: &LogContext, args: &[LogValue<'_>]) {
        self.log(ctx, LogLevel::Stack, args);
    }

    /// Positional emission at `Fatal`. If enabled, the process exits with
    /// [`FATAL_EXIT_CODE`] once the line is flushed.
    #[track_caller]
    #[inline]
    pub fn fatal(&self, ctx: &LogContext, args: &[LogValue<'_>]) {
        self.log(ctx, LogLevel::Fatal, args);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, ctx: &LogContext, args: &[LogValue<'_>]) {
        self.log(ctx, LogLevel::Error, args);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, ctx: &LogContext, args: &[LogValue<'_>]) {
        self.log(ctx, LogLevel::Warn, args);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, ctx: &LogContext, args: &[LogValue<'_>]) {
        self.log(ctx, LogLevel::Info, args);
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, ctx: &LogContext, args: &[LogValue<'_>]) {
        self.log(ctx, LogLevel::Debug, args);
    }

    #[track_caller]
    #[inline]
    pub fn trace(&self, ctx: &LogContext, args: &[LogValue<'_>]) {
        self.log(ctx, LogLevel::Trace, args);
    }

    #[track_caller]
    #[inline]
    pub fn stackf(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.logf(ctx, LogLevel::Stack, args);
    }

    #[track_caller]
    #[inline]
    pub fn fatalf(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.logf(ctx, LogLevel::Fatal, args);
    }

    #[track_caller]
    #[inline]
    pub fn errorf(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.logf(ctx, LogLevel::Error, args);
    }

    #[track_caller]
    #[inline]
    pub fn warnf(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.logf(ctx, LogLevel::Warn, args);
    }

    #[track_caller]
    #[inline]
    pub fn infof(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.logf(ctx, LogLevel::Info, args);
    }

    #[track_caller]
    #[inline]
    pub fn debugf(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.logf(ctx, LogLevel::Debug, args);
    }

    #[track_caller]
    #[inline]
    pub fn tracef(&self, ctx: &LogContext, args: fmt::Arguments<'_>) {
        self.logf(ctx, LogLevel::Trace, args);
    }
}

impl Default for Logger {
    /// `Info` threshold, writing to stdout.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("threshold", &state.threshold)
            .field("counts", &state.counts)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use ctx_logger_system::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .threshold(LogLevel::Debug)
///     .output(sink.clone())
///     .time_zone(TimeZoneChoice::Utc)
///     .build();
///
/// logger.debug(&LogContext::new(), &["ready".into()]);
/// assert!(sink.contents().contains("[DEBUG] [-] ready"));
/// ```
pub struct LoggerBuilder {
    threshold: LogLevel,
    output: Option<Box<dyn Write + Send>>,
    resolver: Arc<dyn CallerResolver>,
    encoder: Arc<dyn ValueEncoder>,
    time_zone: TimeZoneChoice,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            threshold: LogLevel::Info,
            output: None,
            resolver: Arc::new(SourceResolver),
            encoder: Arc::new(JsonEncoder),
            time_zone: TimeZoneChoice::default(),
        }
    }

    /// Set the initial threshold
    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    /// Set the output sink. Defaults to stdout.
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.output = Some(Box::new(writer));
        self
    }

    /// Replace the call-site resolver
    #[must_use = "builder methods return a new value"]
    pub fn resolver<R: CallerResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replace the encoder used for structured values
    #[must_use = "builder methods return a new value"]
    pub fn encoder<E: ValueEncoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    /// Time zone of line timestamps
    #[must_use = "builder methods return a new value"]
    pub fn time_zone(mut self, zone: TimeZoneChoice) -> Self {
        self.time_zone = zone;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let output = self
            .output
            .unwrap_or_else(|| Box::new(std::io::stdout()));

        Logger {
            state: RwLock::new(LoggerState {
                threshold: self.threshold,
                sink: Mutex::new(BufWriter::new(output)),
                counts: LevelCounts::new(),
            }),
            resolver: self.resolver,
            encoder: self.encoder,
            time_zone: self.time_zone,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use ctx_logger_system::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .threshold(LogLevel::Warn)
    ///     .output(std::io::sink())
    ///     .build();
    /// assert_eq!(logger.threshold(), LogLevel::Warn);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
