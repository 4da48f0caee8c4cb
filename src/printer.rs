//! Tree printers built on the same visitor traits as the interpreter.
//!
//! [`AstPrinter`] renders the fully parenthesized prefix form used for
//! debugging (`(* (- 123) (group 45.67))`). [`SourcePrinter`] renders infix
//! source text that parses back to the same tree.

use crate::ast::{Expr, ExprVisitor, Stmt, StmtVisitor};
use crate::token::Token;
use crate::value::Value;

#[derive(Debug, Default)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        stmt.accept(self)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let parts: Vec<String> = exprs.iter().map(|expr| expr.accept(self)).collect();
        Self::wrap(name, &parts)
    }

    fn wrap(name: &str, parts: &[String]) -> String {
        if parts.is_empty() {
            format!("({})", name)
        } else {
            format!("({} {})", name, parts.join(" "))
        }
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal(&mut self, value: &Value) -> String {
        value.to_string()
    }

    fn visit_grouping(&mut self, expr: &Expr) -> String {
        self.parenthesize("group", &[expr])
    }

    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> String {
        self.parenthesize(&operator.lexeme, &[right])
    }

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> String {
        self.parenthesize(&operator.lexeme, &[left, right])
    }

    fn visit_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> String {
        self.parenthesize(&format!("logical {}", operator.lexeme), &[left, right])
    }

    fn visit_variable(&mut self, name: &Token) -> String {
        name.lexeme.clone()
    }

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> String {
        let value = value.accept(self);
        Self::wrap("=", &[name.lexeme.clone(), value])
    }

    fn visit_call(&mut self, callee: &Expr, _paren: &Token, arguments: &[Expr]) -> String {
        let mut parts = vec![callee.accept(self)];
        parts.extend(arguments.iter().map(|argument| argument.accept(self)));
        Self::wrap("call", &parts)
    }

    fn visit_get(&mut self, object: &Expr, name: &Token) -> String {
        let object = object.accept(self);
        Self::wrap(".", &[object, name.lexeme.clone()])
    }

    fn visit_set(&mut self, object: &Expr, name: &Token, value: &Expr) -> String {
        let object = object.accept(self);
        let value = value.accept(self);
        Self::wrap("=", &[object, name.lexeme.clone(), value])
    }

    fn visit_self(&mut self, _keyword: &Token) -> String {
        "self".to_string()
    }

    fn visit_super(&mut self, _keyword: &Token, method: &Token) -> String {
        Self::wrap("super", &[method.lexeme.clone()])
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_expression_stmt(&mut self, expr: &Expr) -> String {
        self.parenthesize(";", &[expr])
    }

    fn visit_print_stmt(&mut self, _keyword: &Token, expr: &Expr) -> String {
        self.parenthesize("print", &[expr])
    }
}

/// Prints statements back as source text.
///
/// Only the parenthesization present in the tree is emitted, so this is
/// exact for trees the parser produced: re-parsing the output gives the same
/// tree back.
#[derive(Debug, Default)]
pub struct SourcePrinter;

impl SourcePrinter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    pub fn print_program(&mut self, statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(|stmt| stmt.accept(self))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn literal(value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) if n.is_nan() => "(0.0 / 0.0)".to_string(),
            Value::Float(n) if n.is_infinite() => {
                let sign = if *n > 0.0 { "" } else { "-" };
                format!("({}1.0 / 0.0)", sign)
            }
            // Keep a fractional digit so the literal scans as a float again.
            Value::Float(n) if n.fract() == 0.0 => format!("{:.1}", n),
            Value::Float(n) => n.to_string(),
            Value::String(s) => {
                let quote = if s.contains('"') { '\'' } else { '"' };
                format!("{}{}{}", quote, s, quote)
            }
        }
    }
}

impl ExprVisitor<String> for SourcePrinter {
    fn visit_literal(&mut self, value: &Value) -> String {
        Self::literal(value)
    }

    fn visit_grouping(&mut self, expr: &Expr) -> String {
        format!("({})", expr.accept(self))
    }

    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> String {
        format!("{}{}", operator.lexeme, right.accept(self))
    }

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> String {
        format!("{} {} {}", left.accept(self), operator.lexeme, right.accept(self))
    }

    fn visit_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> String {
        format!("{} {} {}", left.accept(self), operator.lexeme, right.accept(self))
    }

    fn visit_variable(&mut self, name: &Token) -> String {
        name.lexeme.clone()
    }

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> String {
        format!("{} = {}", name.lexeme, value.accept(self))
    }

    fn visit_call(&mut self, callee: &Expr, _paren: &Token, arguments: &[Expr]) -> String {
        let arguments: Vec<String> = arguments.iter().map(|a| a.accept(self)).collect();
        format!("{}({})", callee.accept(self), arguments.join(", "))
    }

    fn visit_get(&mut self, object: &Expr, name: &Token) -> String {
        format!("{}.{}", object.accept(self), name.lexeme)
    }

    fn visit_set(&mut self, object: &Expr, name: &Token, value: &Expr) -> String {
        format!("{}.{} = {}", object.accept(self), name.lexeme, value.accept(self))
    }

    fn visit_self(&mut self, keyword: &Token) -> String {
        keyword.lexeme.clone()
    }

    fn visit_super(&mut self, keyword: &Token, method: &Token) -> String {
        format!("{}.{}", keyword.lexeme, method.lexeme)
    }
}

impl StmtVisitor<String> for SourcePrinter {
    fn visit_expression_stmt(&mut self, expr: &Expr) -> String {
        format!("{};", expr.accept(self))
    }

    fn visit_print_stmt(&mut self, keyword: &Token, expr: &Expr) -> String {
        format!("{} {};", keyword.lexeme, expr.accept(self))
    }
}
