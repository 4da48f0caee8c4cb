use std::io::{self, Write};

use crate::ast::Stmt;
use crate::error::{Diagnostic, Diagnostics, RuntimeError};
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::printer::AstPrinter;

/// How diagnostics are written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticStyle {
    /// `[line N] Error at 'x': message`
    #[default]
    Plain,
    /// Source-labelled ariadne reports.
    Rich,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub style: DiagnosticStyle,
    /// Print the parsed tree to the interpreter's output instead of running
    /// it.
    pub print_ast: bool,
    pub filename: Option<String>,
}

/// Result of one pass through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// At least one lexical or parse error was reported.
    CompileError,
    RuntimeError,
}

impl Status {
    /// Process exit code for this status.
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::CompileError => 65,
            Status::RuntimeError => 70,
        }
    }
}

/// Scans and parses `source`. Errors from both stages end up in
/// `diagnostics`; the statements that did parse are returned regardless.
pub fn compile(source: &str, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
    let tokens = Lexer::new(source).scan_tokens(diagnostics);
    Parser::new(tokens).parse(diagnostics)
}

/// Runs `source` through the whole pipeline, writing diagnostics to stderr.
///
/// Statements that parsed are executed even when another statement had a
/// syntax error; the status still reports the compile error.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn run_source<W: Write>(
    source: &str,
    interpreter: &mut Interpreter<W>,
    options: &RunOptions,
) -> Status {
    let mut diagnostics = Diagnostics::new();
    let statements = compile(source, &mut diagnostics);

    for diagnostic in diagnostics.errors() {
        emit_diagnostic(diagnostic, source, options);
    }

    let compile_status = if diagnostics.had_error() {
        Status::CompileError
    } else {
        Status::Ok
    };

    if options.print_ast {
        return match print_tree(&statements, interpreter.output_mut()) {
            Ok(()) => compile_status,
            Err(error) => {
                eprintln!("Could not write output: {}.", error);
                Status::RuntimeError
            }
        };
    }

    match interpreter.interpret(&statements) {
        Ok(()) => compile_status,
        Err(error) => {
            emit_runtime_error(&error, source, options);
            // A compile error outranks a runtime error for the exit code.
            if compile_status == Status::CompileError {
                compile_status
            } else {
                Status::RuntimeError
            }
        }
    }
}

/// Writes each statement in prefix form, one per line.
fn print_tree<W: Write>(statements: &[Stmt], out: &mut W) -> io::Result<()> {
    let mut printer = AstPrinter::new();
    for statement in statements {
        writeln!(out, "{}", printer.print_stmt(statement))?;
    }
    out.flush()
}

fn emit_diagnostic(diagnostic: &Diagnostic, source: &str, options: &RunOptions) {
    if options.style == DiagnosticStyle::Rich
        && diagnostic
            .report(source, options.filename.as_deref())
            .is_ok()
    {
        return;
    }
    eprintln!("{}", diagnostic);
}

fn emit_runtime_error(error: &RuntimeError, source: &str, options: &RunOptions) {
    if options.style == DiagnosticStyle::Rich
        && error.report(source, options.filename.as_deref()).is_ok()
    {
        return;
    }
    eprintln!("{}", error.plain());
}
