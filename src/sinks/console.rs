//! Console sink implementation

use std::io::{self, Write};

/// Standard stream written by a [`ConsoleSink`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Writes log lines to stdout or stderr.
///
/// # Example
///
/// ```
/// use ctx_logger_system::prelude::*;
///
/// let logger = Logger::new(LogLevel::Info, ConsoleSink::stderr());
/// logger.info(&LogContext::new(), &["to stderr".into()]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    target: ConsoleTarget,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Write for ConsoleSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write(buf),
            ConsoleTarget::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        // Keep a whole line under one stream lock
        match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write_all(buf),
            ConsoleTarget::Stderr => io::stderr().lock().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        }
    }
}
