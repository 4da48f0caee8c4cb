use crate::ast::{Expr, Stmt};
use crate::error::{Diagnostics, ErrorKind};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Recursive-descent parser.
///
/// ```text
/// program        → statement* EOF
/// statement      → "print" expression ";" | expression ";"
/// expression     → equality
/// equality       → comparison ( ( "!=" | "==" ) comparison )*
/// comparison     → addition ( ( ">" | ">=" | "<" | "<=" ) addition )*
/// addition       → multiplication ( ( "-" | "+" ) multiplication )*
/// multiplication → unary ( ( "/" | "*" ) unary )*
/// unary          → ( "!" | "-" ) unary | primary
/// primary        → "false" | "true" | "null" | INTEGER | FLOAT | STRING
///                | "(" expression ")"
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

/// Raised inside the descent and caught by the statement loop.
#[derive(Debug, Clone, PartialEq)]
struct ParseError {
    token: Token,
    message: String,
}

type ParseResult<T> = Result<T, ParseError>;

impl Parser {
    /// Comment tokens are dropped here; the grammar never sees them.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| token.token_type != TokenType::Comment)
            .collect();

        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::synthetic(TokenType::Eof, "", line));
        }

        Self { tokens, current: 0 }
    }

    /// Parses every statement it can. A malformed statement is reported to
    /// `diagnostics` and skipped; the statements around it are still returned.
    /// No rule accepts an `Error` token, so a statement holding one is always
    /// skipped.
    pub fn parse(&mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    // A rejected lexeme was already reported by the lexer.
                    if error.token.token_type != TokenType::Error {
                        diagnostics.error(ErrorKind::Parse, &error.token, &error.message);
                    }
                    self.synchronize();
                }
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = diagnostics.len(),
            "parsed program"
        );

        statements
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_types(&[TokenType::Print]) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { keyword, expr })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression { expr })
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while self.match_types(&[TokenType::BangEqual, TokenType::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.addition()?;

        while self.match_types(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.addition()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn addition(&mut self) -> ParseResult<Expr> {
        let mut expr = self.multiplication()?;

        while self.match_types(&[TokenType::Minus, TokenType::Plus]) {
            let operator = self.previous().clone();
            let right = self.multiplication()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn multiplication(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while self.match_types(&[TokenType::Slash, TokenType::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_types(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_types(&[TokenType::False]) {
            return Ok(Expr::literal(Value::Bool(false)));
        }
        if self.match_types(&[TokenType::True]) {
            return Ok(Expr::literal(Value::Bool(true)));
        }
        if self.match_types(&[TokenType::Null]) {
            return Ok(Expr::literal(Value::Null));
        }

        if self.match_types(&[TokenType::Integer, TokenType::Float, TokenType::String]) {
            let token = self.previous();
            return match &token.literal {
                Some(literal) => Ok(Expr::literal(Value::from(literal))),
                None => Err(Self::error(token, "Expect expression.")),
            };
        }

        if self.match_types(&[TokenType::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::grouping(expr));
        }

        Err(Self::error(self.peek(), "Expect expression."))
    }

    /// Discards tokens until a statement boundary: just past a `;`, or right
    /// before a keyword that opens a statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                break;
            }

            if self.peek().token_type.starts_statement() {
                break;
            }

            self.advance();
        }

        tracing::trace!(resume_at = %self.peek().lexeme, line = self.peek().line, "synchronized");
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(*token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            self.peek().token_type == token_type
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> ParseResult<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(Self::error(self.peek(), message))
        }
    }

    fn error(token: &Token, message: &str) -> ParseError {
        ParseError {
            token: token.clone(),
            message: message.to_string(),
        }
    }
}
