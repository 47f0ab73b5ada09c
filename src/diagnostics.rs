//! Diagnostics sink
//!
//! The lexer and parser never print or abort on their own: every problem is
//! turned into a [`Diagnostic`] and handed to a [`Diagnostics`] instance,
//! which renders it immediately (or records it silently, for tests) and
//! keeps the error/warning counters for the run.
//!
//! Rendering follows the usual compiler layout:
//!
//! ```text
//! [main.c:3] [E] expected ';', found 'return'
//!   int x = 1 return x;
//!             ^
//! ```

use crate::parser::ast::SourceLocation;
use crossterm::style::{style, Color, Stylize};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Info => "[I]",
            Level::Warn => "[W]",
            Level::Error => "[E]",
            Level::Fatal => "[F]",
        }
    }

    fn color(self) -> Color {
        match self {
            Level::Info => Color::Cyan,
            Level::Warn => Color::Yellow,
            Level::Error | Level::Fatal => Color::Red,
        }
    }

    fn to_stderr(self) -> bool {
        self >= Level::Error
    }
}

/// One reported problem (or note)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub filename: String,
    pub location: Option<SourceLocation>,
    /// Full text of the offending line, for the caret display
    pub source_line: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: Level, filename: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            filename: filename.to_string(),
            location: None,
            source_line: None,
            message: message.into(),
        }
    }

    pub fn error(filename: &str, message: impl Into<String>) -> Self {
        Self::new(Level::Error, filename, message)
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }

    /// Render the diagnostic, optionally with ANSI colours.
    pub fn render(&self, color: bool) -> String {
        let header = match self.location {
            Some(loc) => format!("[{}:{}] {}", self.filename, loc.line, self.level.tag()),
            None => format!("[{}] {}", self.filename, self.level.tag()),
        };
        let header = if color {
            let styled = style(header).with(self.level.color());
            if self.level == Level::Fatal {
                styled.bold().to_string()
            } else {
                styled.to_string()
            }
        } else {
            header
        };

        let mut out = format!("{header} {}\n", self.message);
        if let (Some(line), Some(loc)) = (&self.source_line, self.location) {
            if loc.column > 0 {
                let caret = if color {
                    "^".green().to_string()
                } else {
                    "^".to_string()
                };
                out.push_str(&format!("  {line}\n"));
                out.push_str(&format!("  {}{caret}\n", " ".repeat(loc.column - 1)));
            }
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Where rendered diagnostics go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emitter {
    Terminal { color: bool },
    Capture,
}

/// Diagnostic sink and per-run counters
#[derive(Debug)]
pub struct Diagnostics {
    emitter: Emitter,
    errors: usize,
    warnings: usize,
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Print diagnostics to stdout/stderr as they arrive.
    pub fn terminal(color: bool) -> Self {
        Self::with_emitter(Emitter::Terminal { color })
    }

    /// Record diagnostics without printing them.
    pub fn capture() -> Self {
        Self::with_emitter(Emitter::Capture)
    }

    fn with_emitter(emitter: Emitter) -> Self {
        Self {
            emitter,
            errors: 0,
            warnings: 0,
            reported: Vec::new(),
        }
    }

    /// Count, render and record a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Error | Level::Fatal => self.errors += 1,
            Level::Warn => self.warnings += 1,
            Level::Info => {}
        }

        if let Emitter::Terminal { color } = self.emitter {
            let text = diagnostic.render(color);
            // Write failures are ignored.
            if diagnostic.level.to_stderr() {
                let _ = io::stdout().flush();
                let mut err = io::stderr().lock();
                let _ = err.write_all(text.as_bytes());
                let _ = err.flush();
            } else {
                let _ = io::stderr().flush();
                let mut out = io::stdout().lock();
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
        }

        self.reported.push(diagnostic);
    }

    /// Report an informational note without a source position.
    pub fn info(&mut self, filename: &str, message: impl Into<String>) {
        self.report(Diagnostic::new(Level::Info, filename, message));
    }

    /// Report an unrecoverable condition and terminate the process.
    pub fn fatal(&mut self, filename: &str, message: impl Into<String>) -> ! {
        let diagnostic = Diagnostic::new(Level::Fatal, filename, message);
        if self.emitter == Emitter::Capture {
            // Fatal conditions always reach the terminal.
            eprint!("{}", diagnostic.render(false));
        }
        self.report(diagnostic);
        std::process::exit(1);
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Everything reported since creation or the last [`reset`](Self::reset)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.reported
    }

    /// Messages of everything reported, in order
    pub fn messages(&self) -> Vec<&str> {
        self.reported.iter().map(|d| d.message.as_str()).collect()
    }

    /// Clear counters and recorded diagnostics between runs.
    pub fn reset(&mut self) {
        self.errors = 0;
        self.warnings = 0;
        self.reported.clear();
    }
}

/// Text of the line containing byte `offset`, without its newline.
///
/// Bytes that are not valid UTF-8 show up as U+FFFD.
pub fn line_containing<S: AsRef<[u8]> + ?Sized>(source: &S, offset: usize) -> Cow<'_, str> {
    let bytes = source.as_ref();
    let offset = offset.min(bytes.len());
    let start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let end = bytes[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |i| offset + i);
    String::from_utf8_lossy(&bytes[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_with_caret() {
        let diagnostic = Diagnostic::error("main.c", "expected ';'")
            .at(SourceLocation::new(2, 9))
            .with_source_line("  x = 1 y");
        assert_eq!(
            diagnostic.render(false),
            "[main.c:2] [E] expected ';'\n    x = 1 y\n          ^\n"
        );
    }

    #[test]
    fn test_render_without_location() {
        let diagnostic = Diagnostic::new(Level::Info, "main.c", "parsed 2 functions");
        assert_eq!(diagnostic.render(false), "[main.c] [I] parsed 2 functions\n");
    }

    #[test]
    fn test_colored_render_keeps_message() {
        let diagnostic = Diagnostic::new(Level::Warn, "a.c", "careful").at(SourceLocation::new(1, 1));
        let text = diagnostic.render(true);
        assert!(text.contains("[a.c:1]"));
        assert!(text.ends_with("careful\n"));
    }

    #[test]
    fn test_counters_and_reset() {
        let mut diagnostics = Diagnostics::capture();
        diagnostics.report(Diagnostic::error("a.c", "one"));
        diagnostics.report(Diagnostic::new(Level::Warn, "a.c", "two"));
        diagnostics.info("a.c", "three");

        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.messages(), vec!["one", "two", "three"]);

        diagnostics.reset();
        assert_eq!(diagnostics.error_count(), 0);
        assert!(diagnostics.diagnostics().is_empty());
    }

    #[test]
    fn test_line_containing() {
        let source = "int a;\nint b = @;\nint c;";
        assert_eq!(line_containing(source, 0), "int a;");
        assert_eq!(line_containing(source, 15), "int b = @;");
        assert_eq!(line_containing(source, source.len()), "int c;");
        assert_eq!(line_containing(source, 6), "int a;");
    }

    #[test]
    fn test_line_containing_raw_bytes() {
        let source = b"int a;\nchar c = \xE9;\n";
        assert_eq!(line_containing(source, 16), "char c = \u{FFFD};");
        assert_eq!(line_containing(&source[..], 0), "int a;");
    }
}
