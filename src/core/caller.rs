//! Call-site capture and resolution
//!
//! A [`CallSite`] is captured for free where the log call is written
//! (`#[track_caller]` location, plus the enclosing function name when a
//! macro is used). Turning it into the displayed [`Caller`] is deferred to a
//! [`CallerResolver`] and only happens for enabled emissions.

use std::backtrace::Backtrace;
use std::panic::Location;

/// Raw call-site data captured at the log call.
#[derive(Debug, Clone, Copy)]
pub struct CallSite {
    pub location: &'static Location<'static>,
    pub function: Option<&'static str>,
}

impl CallSite {
    /// Capture the location of the caller.
    #[track_caller]
    #[inline]
    pub fn here() -> Self {
        Self {
            location: Location::caller(),
            function: None,
        }
    }

    /// Capture the location of the caller along with a function path
    /// such as `my_crate::handlers::login`.
    #[track_caller]
    #[inline]
    pub fn with_function(function: &'static str) -> Self {
        Self {
            location: Location::caller(),
            function: Some(function),
        }
    }
}

/// Resolved, display-ready caller information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub function: String,
    pub line: u32,
}

impl Caller {
    /// Placeholder used when resolution fails.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Turns a captured call site into display-ready caller information.
///
/// Returning `None` makes the logger print placeholders; the line is still
/// emitted.
pub trait CallerResolver: Send + Sync {
    fn resolve(&self, site: &CallSite) -> Option<Caller>;
}

/// Default resolver: last two path segments of the source file without the
/// `.rs` extension, last segment of the function path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceResolver;

impl CallerResolver for SourceResolver {
    fn resolve(&self, site: &CallSite) -> Option<Caller> {
        Some(Caller {
            file: short_file(site.location.file()).to_string(),
            function: site.function.map(short_function).unwrap_or_default().to_string(),
            line: site.location.line(),
        })
    }
}

/// [`SourceResolver`] that also names the function for calls made through
/// the `Logger` methods, by finding the call site's frame in a backtrace.
///
/// Captures a backtrace for every enabled emission that lacks a function
/// name, and needs debug symbols to find anything. Lines are still emitted
/// with an empty function field when no frame matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceResolver;

impl CallerResolver for BacktraceResolver {
    fn resolve(&self, site: &CallSite) -> Option<Caller> {
        let mut caller = SourceResolver.resolve(site)?;
        if site.function.is_none() {
            let trace = Backtrace::force_capture().to_string();
            if let Some(symbol) = frame_symbol(&trace, site.location.file(), site.location.line()) {
                caller.function = short_function(strip_hash(symbol)).to_string();
            }
        }
        Some(caller)
    }
}

/// Symbol of the first backtrace frame located at `file:line`.
fn frame_symbol<'t>(trace: &'t str, file: &str, line: u32) -> Option<&'t str> {
    let file = file.replace('\\', "/");
    let mut symbol = None;
    for entry in trace.lines().map(str::trim) {
        if let Some(at) = entry.strip_prefix("at ") {
            let mut parts = at.rsplitn(3, ':');
            let _column = parts.next();
            let (Some(line_no), Some(path)) = (parts.next(), parts.next()) else {
                continue;
            };
            if line_no.parse::<u32>().ok() == Some(line) && path.replace('\\', "/").ends_with(&file) {
                return symbol;
            }
        } else {
            symbol = Some(match entry.split_once(": ") {
                Some((index, name)) if index.chars().all(|c| c.is_ascii_digit()) => name,
                _ => entry,
            });
        }
    }
    None
}

/// Drop a trailing `::h0123456789abcdef` symbol hash.
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::") {
        Some((head, tail))
            if tail.len() == 17
                && tail.starts_with('h')
                && tail[1..].chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            head
        }
        _ => symbol,
    }
}

/// `src/core/logger.rs` becomes `core/logger`.
pub fn short_file(path: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    let start = match path.rfind(is_sep) {
        Some(last) => path[..last].rfind(is_sep).map_or(0, |prev| prev + 1),
        None => 0,
    };
    let short = &path[start..];
    short.strip_suffix(".rs").unwrap_or(short)
}

/// `my_crate::handlers::login::{{closure}}` becomes `login`.
pub fn short_function(path: &str) -> &str {
    path.rsplit("::")
        .find(|segment| !segment.is_empty() && *segment != "{{closure}}")
        .unwrap_or("")
}

/// Full path of the enclosing function, e.g. `my_crate::handlers::login`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_file() {
        assert_eq!(short_file("src/core/logger.rs"), "core/logger");
        assert_eq!(short_file("/home/dev/app/src/main.rs"), "src/main");
        assert_eq!(short_file("lib.rs"), "lib");
        assert_eq!(short_file("tests/integration_tests.rs"), "tests/integration_tests");
        assert_eq!(short_file(r"src\handlers\login.rs"), r"handlers\login");
        assert_eq!(short_file("build.generated"), "build.generated");
    }

    #[test]
    fn test_short_function() {
        assert_eq!(short_function("app::handlers::login"), "login");
        assert_eq!(short_function("app::handlers::login::{{closure}}"), "login");
        assert_eq!(short_function("main"), "main");
        assert_eq!(short_function(""), "");
    }

    #[test]
    fn test_source_resolver() {
        let site = CallSite::with_function("ctx_logger_system::core::caller::tests::resolve_me");
        let expected_line = line!() - 1;
        let caller = SourceResolver.resolve(&site).unwrap();

        assert_eq!(caller.file, "core/caller");
        assert_eq!(caller.function, "resolve_me");
        assert_eq!(caller.line, expected_line);
    }

    #[test]
    fn test_function_path_macro() {
        let path = crate::__function_path!();
        assert!(path.ends_with("test_function_path_macro"), "got {}", path);
        assert_eq!(short_function(path), "test_function_path_macro");
    }

    #[test]
    fn test_frame_symbol() {
        let trace = "   0: ctx_logger_system::core::logger::Logger::emit
             at ./src/core/logger.rs:157:22
   1: app::handlers::login::h0123456789abcdef
             at /home/dev/app/src/handlers/login.rs:42:9
   2: app::main
             at ./src/main.rs:7:5
   3: std::rt::lang_start
";
        assert_eq!(
            frame_symbol(trace, "src/handlers/login.rs", 42),
            Some("app::handlers::login::h0123456789abcdef")
        );
        assert_eq!(frame_symbol(trace, "src/main.rs", 7), Some("app::main"));
        assert_eq!(frame_symbol(trace, "src/main.rs", 8), None);
        assert_eq!(frame_symbol(trace, r"src\handlers\login.rs", 42).map(strip_hash), Some("app::handlers::login"));
    }

    #[test]
    fn test_strip_hash() {
        assert_eq!(strip_hash("app::login::h0123456789abcdef"), "app::login");
        assert_eq!(strip_hash("app::login"), "app::login");
        assert_eq!(strip_hash("app::handler"), "app::handler");
    }

    #[test]
    fn test_backtrace_resolver_keeps_macro_function() {
        let site = CallSite::with_function("app::handlers::login");
        let caller = BacktraceResolver.resolve(&site).unwrap();
        assert_eq!(caller.function, "login");
        assert_eq!(caller.file, "core/caller");
    }

    #[test]
    fn test_here_without_function() {
        let site = CallSite::here();
        let caller = SourceResolver.resolve(&site).unwrap();
        assert_eq!(caller.function, "");
        assert_eq!(Caller::unknown().line, 0);
    }
}
