use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use std::fmt;
use std::io::{self, Write};

use crate::token::{Token, TokenType};

/// Byte range of a lexeme in the source text. Only used to place labels in
/// rich reports; the classic diagnostics are line based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Parse,
    Runtime,
}

impl ErrorKind {
    fn color(self) -> Color {
        match self {
            ErrorKind::Lexical => Color::Red,
            ErrorKind::Parse => Color::Yellow,
            ErrorKind::Runtime => Color::Magenta,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::Lexical => "Lexical Error",
            ErrorKind::Parse => "Parse Error",
            ErrorKind::Runtime => "Runtime Error",
        };
        write!(f, "{}", name)
    }
}

/// A lexical or parse error, already formatted the way the driver prints it:
/// `[line <N>] Error<location>: <message>`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub line: usize,
    /// Either empty, `" at end"` or `" at '<lexeme>'"`.
    pub location: String,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    /// Renders a source-labelled report on stderr.
    pub fn report(&self, source: &str, filename: Option<&str>) -> io::Result<()> {
        self.write_report(source, filename, &mut io::stderr(), true)
    }

    /// Writes the same report to `out`.
    pub fn write_report(
        &self,
        source: &str,
        filename: Option<&str>,
        out: &mut dyn Write,
        color: bool,
    ) -> io::Result<()> {
        let report = RichReport {
            kind: self.kind,
            span: &self.span,
            headline: &self.to_string(),
            label: &self.message,
        };
        report.write(source, filename, out, color)
    }
}

/// Error sink shared by the lexer and the parser.
///
/// Replaces the sticky `had_error` flag of a global driver: every stage gets a
/// `&mut Diagnostics` and the caller inspects it once the stage returns.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        kind: ErrorKind,
        line: usize,
        location: &str,
        message: &str,
        span: Span,
    ) {
        let diagnostic = Diagnostic {
            kind,
            line,
            location: location.to_string(),
            message: message.to_string(),
            span,
        };
        tracing::debug!(%diagnostic, "diagnostic reported");
        self.errors.push(diagnostic);
    }

    /// Reports an error pointing at `token`.
    pub fn error(&mut self, kind: ErrorKind, token: &Token, message: &str) {
        let location = if token.token_type == TokenType::Eof {
            " at end".to_string()
        } else {
            format!(" at '{}'", token.lexeme)
        };
        self.report(kind, token.line, &location, message, token.span.clone());
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Type violation raised while evaluating. Carries the offending token so the
/// driver can point at its line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            token: token.clone(),
            message: message.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.token.line
    }

    /// The classic two-line form: `<message>\n[line <N>]`.
    pub fn plain(&self) -> String {
        format!("{}\n[line {}]", self.message, self.token.line)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) -> io::Result<()> {
        self.write_report(source, filename, &mut io::stderr(), true)
    }

    pub fn write_report(
        &self,
        source: &str,
        filename: Option<&str>,
        out: &mut dyn Write,
        color: bool,
    ) -> io::Result<()> {
        let report = RichReport {
            kind: ErrorKind::Runtime,
            span: &self.token.span,
            headline: &self.message,
            label: &format!("'{}' raised here", self.token.lexeme),
        };
        report.write(source, filename, out, color)
    }
}

/// One ariadne report with a single label.
struct RichReport<'a> {
    kind: ErrorKind,
    span: &'a Span,
    headline: &'a str,
    label: &'a str,
}

impl RichReport<'_> {
    /// Spans are byte offsets into `source`.
    fn write(
        &self,
        source: &str,
        filename: Option<&str>,
        out: &mut dyn Write,
        color: bool,
    ) -> io::Result<()> {
        let filename = filename.unwrap_or("<repl>");
        let kind_color = self.kind.color();
        let config = Config::default()
            .with_color(color)
            .with_index_type(IndexType::Byte);

        let kind = if color {
            self.kind.to_string().fg(kind_color).to_string()
        } else {
            self.kind.to_string()
        };

        Report::build(ReportKind::Error, filename, self.span.start)
            .with_config(config)
            .with_message(format!("{}: {}", kind, self.headline))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(self.label)
                    .with_color(kind_color),
            )
            .finish()
            .write((filename, Source::from(source)), out)
    }
}
