//! Start/elapsed timing lines
//!
//! `cost*` emits `<label> start...` and returns a [`CostToken`];
//! [`Logger::finish`] emits `<label> cost <elapsed>` for it. Both steps check
//! enablement on their own, since the threshold may change in between.

use super::caller::CallSite;
use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::logger::{Body, Logger};
use super::value::{render_positional, LogValue};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::time::{Duration, Instant};

/// Handle returned by the `cost*` methods.
///
/// Finishing a token more than once emits one elapsed line per call, each
/// measured from the original start.
#[derive(Debug, Clone)]
pub struct CostToken {
    level: LogLevel,
    ctx: LogContext,
    label: Vec<u8>,
    function: Option<&'static str>,
    start: Instant,
}

impl CostToken {
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn context(&self) -> &LogContext {
        &self.ctx
    }

    /// Rendered label, without its leading space.
    pub fn label(&self) -> Cow<'_, str> {
        let label = self.label.strip_prefix(b" ").unwrap_or(&self.label[..]);
        String::from_utf8_lossy(label)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Logger {
    /// Start timing at `Info` with a positional label.
    #[track_caller]
    pub fn cost(&self, ctx: &LogContext, label: &[LogValue<'_>]) -> CostToken {
        self.cost_at(ctx, LogLevel::Info, label)
    }

    /// Start timing at `level` with a positional label.
    #[track_caller]
    pub fn cost_at(&self, ctx: &LogContext, level: LogLevel, label: &[LogValue<'_>]) -> CostToken {
        self.begin_cost(ctx, level, CallSite::here(), self.render_label(label))
    }

    /// Render a positional label the way it appears after the line prefix.
    pub fn render_label(&self, label: &[LogValue<'_>]) -> Vec<u8> {
        let mut rendered = Vec::new();
        render_positional(label, &mut rendered, self.encoder());
        rendered
    }

    /// Start timing at `Info` with a templated label.
    #[track_caller]
    pub fn costf(&self, ctx: &LogContext, label: fmt::Arguments<'_>) -> CostToken {
        self.costf_at(ctx, LogLevel::Info, label)
    }

    /// Start timing at `level` with a templated label.
    #[track_caller]
    pub fn costf_at(&self, ctx: &LogContext, level: LogLevel, label: fmt::Arguments<'_>) -> CostToken {
        let mut rendered = vec![b' '];
        let _ = rendered.write_fmt(label);
        self.begin_cost(ctx, level, CallSite::here(), rendered)
    }

    /// Emit the start line for an already rendered label.
    ///
    /// `label` is appended verbatim after the line prefix, so it carries its
    /// own leading space unless empty.
    pub fn begin_cost(&self, ctx: &LogContext, level: LogLevel, site: CallSite, label: Vec<u8>) -> CostToken {
        let mut body = label.clone();
        body.extend_from_slice(b" start...");
        self.log_at(ctx, level, site, Body::Raw(&body));

        CostToken {
            level,
            ctx: ctx.clone(),
            label,
            function: site.function,
            start: Instant::now(),
        }
    }

    /// Emit the elapsed line for `token`.
    #[track_caller]
    pub fn finish(&self, token: &CostToken) {
        self.finish_at(token, CallSite::here());
    }

    pub fn finish_at(&self, token: &CostToken, site: CallSite) {
        if !self.is_enabled(&token.ctx, token.level) {
            return;
        }
        let site = CallSite {
            function: site.function.or(token.function),
            ..site
        };

        let mut body = token.label.clone();
        body.extend_from_slice(b" cost ");
        body.extend_from_slice(format_elapsed(token.elapsed()).as_bytes());
        self.log_at(&token.ctx, token.level, site, Body::Raw(&body));
    }
}

/// Elapsed time truncated to milliseconds: `0s`, `12ms`, `1.5s`, `1m5s`,
/// `1h2m3.5s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }
    if millis < 1000 {
        return format!("{}ms", millis);
    }

    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1000) % 60;
    let fraction = millis % 1000;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    let _ = write!(out, "{}", seconds);
    if fraction > 0 {
        let digits = format!("{:03}", fraction);
        let _ = write!(out, ".{}", digits.trim_end_matches('0'));
    }
    out.push('s');
    out
}
