use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::ops::Range;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FridhError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    ParseError,
    ScopeError,
    /// An invariant of operator resolution was broken. Reaching this means an
    /// earlier validation step let malformed input through.
    InternalError,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::LexError => "Lexical Error",
            ErrorKind::ParseError => "Parse Error",
            ErrorKind::ScopeError => "Scope Error",
            ErrorKind::InternalError => "Internal Error",
        }
    }

    fn color(&self) -> Color {
        match self {
            ErrorKind::LexError => Color::Red,
            ErrorKind::ParseError => Color::Yellow,
            ErrorKind::ScopeError => Color::Magenta,
            ErrorKind::InternalError => Color::Blue,
        }
    }
}

/// Every failure of the front end: one message plus the 1-based source line
/// on which it was detected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Line {line}: {message}")]
pub struct FridhError {
    pub kind: ErrorKind,
    pub line: usize,
    pub message: String,
    pub help: Option<String>,
}

impl FridhError {
    pub fn new(kind: ErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn lex_error(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LexError, line, message)
    }

    pub fn parse_error(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError, line, message)
    }

    pub fn parse_error_with_help(
        line: usize,
        message: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self::parse_error(line, message).with_help(help)
    }

    pub fn scope_error(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ScopeError, line, message)
    }

    pub fn internal_error(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, line, message)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<input>");
        let color = self.kind.color();
        let span = line_span(source, self.line);

        let mut report_builder = Report::build(ReportKind::Error, filename, span.start)
            .with_message(format!("{}: {}", self.kind.label().fg(color), self.message))
            .with_label(
                Label::new((filename, span))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        // Printing to stderr only fails when stderr itself is gone.
        let _ = report_builder
            .finish()
            .eprint((filename, Source::from(source)));
    }
}

/// Character range of a 1-based line, without its line break.
fn line_span(source: &str, line: usize) -> Range<usize> {
    let mut start = 0;
    let mut current_line = 1;
    let mut chars = 0;

    for c in source.chars() {
        if current_line == line && c == '\n' {
            return start..chars;
        }
        chars += 1;
        if c == '\n' {
            current_line += 1;
            if current_line == line {
                start = chars;
            }
        }
    }

    if current_line == line {
        start..chars
    } else {
        chars..chars
    }
}
