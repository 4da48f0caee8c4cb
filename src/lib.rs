// Lox Language Interpreter Library
//
// Lexer, parser and tree-walking interpreter for a small dynamically typed
// scripting language, plus the file runner and REPL used by the `lox` binary.

// Public modules
pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod repl;
pub mod runner;
pub mod token;
pub mod value;

// Re-export commonly used items
pub use ast::{Expr, ExprVisitor, Stmt, StmtVisitor};
pub use error::{Diagnostic, Diagnostics, ErrorKind, RuntimeError, Span};
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use parser::Parser;
pub use printer::{AstPrinter, SourcePrinter};
pub use token::{Literal, Token, TokenType};
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{compile, run_source, DiagnosticStyle, RunOptions, Status};
