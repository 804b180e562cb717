//! User-facing diagnostics sink.
//!
//! A `Diagnostics` value is created once per process and handed to whatever
//! needs to report. Leveled messages carry an `info:`/`warn:`/`error:`/`debug:`
//! prefix; result bytes are written verbatim to the output stream.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use colored::{ColoredString, Colorize};
use soar_config::LogOptions;

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Only shown with debug output enabled.
    Debug,
    /// Progress and notices; hidden when quiet.
    Info,
    /// Recoverable problems; hidden when quiet.
    Warn,
    /// Failures; always shown on the error stream.
    Error,
}

impl Level {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn colored(self) -> ColoredString {
        let prefix = self.prefix();
        match self {
            Self::Debug => prefix.bright_black(),
            Self::Info => prefix.blue(),
            Self::Warn => prefix.yellow(),
            Self::Error => prefix.red(),
        }
    }
}

/// Output and error streams plus the switches controlling what reaches them.
pub struct Diagnostics {
    options: LogOptions,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Diagnostics {
    /// Sink writing results to stdout and errors to stderr.
    #[must_use]
    pub fn stdio(options: LogOptions) -> Self {
        Self::with_writers(options, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Sink writing to the supplied streams.
    #[must_use]
    pub fn with_writers(options: LogOptions, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        force_color(options);
        Self { options, out, err }
    }

    /// Replace the switches once the full configuration is known. Streams are kept.
    pub fn set_options(&mut self, options: LogOptions) {
        force_color(options);
        self.options = options;
    }

    /// Whether a message at `level` would be written.
    #[must_use]
    pub const fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Debug => self.options.use_debug,
            Level::Info | Level::Warn => !self.options.quiet,
            Level::Error => true,
        }
    }

    /// Emit a debug line.
    pub fn debug(&mut self, message: impl Display) {
        self.emit(Level::Debug, &message);
    }

    /// Emit an informational line.
    pub fn info(&mut self, message: impl Display) {
        self.emit(Level::Info, &message);
    }

    /// Emit a warning line.
    pub fn warn(&mut self, message: impl Display) {
        self.emit(Level::Warn, &message);
    }

    /// Emit an error line on the error stream.
    pub fn error(&mut self, message: impl Display) {
        self.emit(Level::Error, &message);
    }

    /// Write result bytes followed by a newline to the output stream.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error when the output stream rejects the write.
    pub fn line_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    fn emit(&mut self, level: Level, message: &dyn Display) {
        if !self.enabled(level) {
            return;
        }
        let line = self.format_line(level, message);
        let stream = match level {
            Level::Error => &mut self.err,
            Level::Debug | Level::Info | Level::Warn => &mut self.out,
        };
        if let Err(err) = stream.write_all(line.as_bytes()).and_then(|()| stream.flush()) {
            tracing::debug!(error = %err, "diagnostic write failed");
        }
    }

    fn format_line(&self, level: Level, message: &dyn Display) -> String {
        if self.options.use_color {
            format!("{}: {message}\n", level.colored())
        } else {
            format!("{}: {message}\n", level.prefix())
        }
    }
}

/// Requested color is emitted even when the stream is not a terminal.
fn force_color(options: LogOptions) {
    if options.use_color {
        colored::control::set_override(true);
    }
}

/// Cloneable in-memory stream, for callers that need to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    /// Empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
