use std::io::{self, Write};

use crate::ast::{Expr, ExprVisitor, Stmt, StmtVisitor};
use crate::error::RuntimeError;
use crate::token::{Token, TokenType};
use crate::value::Value;

type EvalResult<T> = Result<T, RuntimeError>;

/// Tree-walking evaluator. Printed values go to `out`.
pub struct Interpreter<W: Write = io::Stdout> {
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    /// The writer printed values go to. The runner and the REPL write their
    /// own text through it so everything lands in one stream.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs `statements` in order. The first runtime error stops the run and
    /// is handed back to the caller.
    pub fn interpret(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        tracing::debug!(statements = statements.len(), "interpreting");

        for statement in statements {
            if let Err(error) = self.execute(statement) {
                tracing::debug!(line = error.line(), message = %error.message, "runtime error");
                return Err(error);
            }
        }

        Ok(())
    }

    pub fn execute(&mut self, stmt: &Stmt) -> EvalResult<()> {
        stmt.accept(self)
    }

    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        expr.accept(self)
    }
}

impl<W: Write> StmtVisitor<EvalResult<()>> for Interpreter<W> {
    fn visit_expression_stmt(&mut self, expr: &Expr) -> EvalResult<()> {
        self.evaluate(expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, keyword: &Token, expr: &Expr) -> EvalResult<()> {
        let value = self.evaluate(expr)?;
        tracing::trace!(line = keyword.line, %value, "print");
        // Flushed per statement: a failed write is blamed on this `print`.
        writeln!(self.out, "{}", value)
            .and_then(|()| self.out.flush())
            .map_err(|e| RuntimeError::new(keyword, format!("Could not write output: {}.", e)))
    }
}

impl<W: Write> ExprVisitor<EvalResult<Value>> for Interpreter<W> {
    fn visit_literal(&mut self, value: &Value) -> EvalResult<Value> {
        Ok(value.clone())
    }

    fn visit_grouping(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.evaluate(expr)
    }

    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> EvalResult<Value> {
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::Bang => Ok(Value::Bool(!right.is_truthy())),
            TokenType::Minus => match right {
                Value::Int(n) => Ok(n
                    .checked_neg()
                    .map_or_else(|| Value::number(-(n as f64)), Value::Int)),
                Value::Float(n) => Ok(Value::number(-n)),
                _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
            },
            _ => Err(unknown_operator(operator)),
        }
    }

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::EqualEqual => Ok(Value::Bool(left.equals(&right))),
            TokenType::BangEqual => Ok(Value::Bool(!left.equals(&right))),
            TokenType::Greater => compare(operator, &left, &right, |o| o.is_gt()),
            TokenType::GreaterEqual => compare(operator, &left, &right, |o| o.is_ge()),
            TokenType::Less => compare(operator, &left, &right, |o| o.is_lt()),
            TokenType::LessEqual => compare(operator, &left, &right, |o| o.is_le()),
            TokenType::Plus => match (&left, &right) {
                (Value::String(l), Value::String(r)) => Ok(Value::String(format!("{}{}", l, r))),
                (l, r) if l.is_number() && r.is_number() => {
                    arithmetic(operator, l, r, i64::checked_add, |l, r| l + r)
                }
                _ => Err(RuntimeError::new(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenType::Minus => arithmetic(operator, &left, &right, i64::checked_sub, |l, r| l - r),
            TokenType::Star => arithmetic(operator, &left, &right, i64::checked_mul, |l, r| l * r),
            // Always a float division; `1 / 0` is `inf`, `0 / 0` is `nan`.
            TokenType::Slash => arithmetic(operator, &left, &right, |_, _| None, |l, r| l / r),
            _ => Err(unknown_operator(operator)),
        }
    }

    fn visit_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult<Value> {
        let left = self.evaluate(left)?;

        match operator.token_type {
            TokenType::Or if left.is_truthy() => Ok(left),
            TokenType::And if !left.is_truthy() => Ok(left),
            TokenType::Or | TokenType::And => self.evaluate(right),
            _ => Err(unknown_operator(operator)),
        }
    }

    fn visit_variable(&mut self, name: &Token) -> EvalResult<Value> {
        Err(unsupported(name, "Variable access"))
    }

    fn visit_assign(&mut self, name: &Token, _value: &Expr) -> EvalResult<Value> {
        Err(unsupported(name, "Assignment"))
    }

    fn visit_call(&mut self, _callee: &Expr, paren: &Token, _arguments: &[Expr]) -> EvalResult<Value> {
        Err(unsupported(paren, "Calling"))
    }

    fn visit_get(&mut self, _object: &Expr, name: &Token) -> EvalResult<Value> {
        Err(unsupported(name, "Property access"))
    }

    fn visit_set(&mut self, _object: &Expr, name: &Token, _value: &Expr) -> EvalResult<Value> {
        Err(unsupported(name, "Property assignment"))
    }

    fn visit_self(&mut self, keyword: &Token) -> EvalResult<Value> {
        Err(unsupported(keyword, "'self'"))
    }

    fn visit_super(&mut self, keyword: &Token, _method: &Token) -> EvalResult<Value> {
        Err(unsupported(keyword, "'super'"))
    }
}

/// `+ - * /` on two numbers. Two integers try `int_op` first and fall back
/// to floats on overflow; the float result is normalized back to an integer
/// when it has no fractional part.
fn arithmetic(
    operator: &Token,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    if let (Value::Int(l), Value::Int(r)) = (left, right) {
        if let Some(n) = int_op(*l, *r) {
            return Ok(Value::Int(n));
        }
    }

    let (l, r) = number_operands(operator, left, right)?;
    Ok(Value::number(float_op(l, r)))
}

fn compare(
    operator: &Token,
    left: &Value,
    right: &Value,
    test: fn(std::cmp::Ordering) -> bool,
) -> EvalResult<Value> {
    if let (Value::Int(l), Value::Int(r)) = (left, right) {
        return Ok(Value::Bool(test(l.cmp(r))));
    }

    let (l, r) = number_operands(operator, left, right)?;
    // NaN is unordered: every comparison with it is false.
    Ok(Value::Bool(l.partial_cmp(&r).map_or(false, test)))
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> EvalResult<(f64, f64)> {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
    }
}

fn unknown_operator(operator: &Token) -> RuntimeError {
    RuntimeError::new(
        operator,
        format!("Unknown operator '{}'.", operator.lexeme),
    )
}

fn unsupported(token: &Token, what: &str) -> RuntimeError {
    RuntimeError::new(token, format!("{} is not supported.", what))
}
