use crate::error::{Diagnostics, ErrorKind, Span};
use crate::token::{Literal, Token, TokenType};

/// Turns source text into tokens.
///
/// `start` and `current` are byte offsets into `source`; `start` marks the
/// first byte of the lexeme being scanned.
pub struct Lexer {
    source: String,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl Lexer {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole source. Lexical errors go to `diagnostics` and the scan
    /// carries on after them, so the result always ends with one `Eof` token.
    pub fn scan_tokens(&mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(diagnostics);
        }

        self.tokens.push(Token::new(
            TokenType::Eof,
            "",
            self.line,
            Span::new(self.current, self.current),
        ));

        tracing::debug!(
            tokens = self.tokens.len(),
            lines = self.line,
            "scanned source"
        );

        std::mem::take(&mut self.tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self, diagnostics: &mut Diagnostics) {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '/' => self.add_token(TokenType::Slash),
            '!' => {
                let token_type = if self.match_char('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.add_token(token_type);
            }
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type);
            }
            '<' => {
                let token_type = if self.match_char('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type);
            }
            '>' => {
                let token_type = if self.match_char('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type);
            }
            '#' => self.comment(),
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' | '\'' => self.string(c, diagnostics),
            c if c.is_ascii_digit() => self.number(diagnostics),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            _ => self.reject(diagnostics, &format!("Unexpected character '{}'.", c)),
        }
    }

    fn advance(&mut self) -> char {
        match self.source[self.current..].chars().next() {
            Some(c) => {
                self.current += c.len_utf8();
                c
            }
            None => '\0',
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn comment(&mut self) {
        while self.peek() != '\n' && !self.is_at_end() {
            self.advance();
        }
        self.add_token(TokenType::Comment);
    }

    fn string(&mut self, quote: char, diagnostics: &mut Diagnostics) {
        while self.peek() != quote && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.reject(diagnostics, "Unterminated string.");
            return;
        }

        // The closing quote.
        self.advance();

        let value = self.source[self.start + 1..self.current - 1].to_string();
        self.add_literal_token(TokenType::String, Literal::String(value));
    }

    fn number(&mut self, diagnostics: &mut Diagnostics) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let mut is_float = false;

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // `1.` and `1.5.2` are neither numbers nor member accesses. The whole
        // run of digits and dots becomes one rejected lexeme.
        if self.peek() == '.' {
            while self.peek() == '.' || self.peek().is_ascii_digit() {
                self.advance();
            }
            self.reject(diagnostics, "Invalid number literal.");
            return;
        }

        let text = &self.source[self.start..self.current];

        if is_float {
            match text.parse::<f64>() {
                Ok(value) => self.add_literal_token(TokenType::Float, Literal::Float(value)),
                Err(_) => self.reject(diagnostics, "Invalid number literal."),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.add_literal_token(TokenType::Integer, Literal::Integer(value)),
                Err(_) => self.reject(diagnostics, "Integer literal too large."),
            }
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let token_type = TokenType::keyword(text).unwrap_or(TokenType::Identifier);

        self.add_token(token_type);
    }

    /// Reports the current lexeme and keeps it in the stream as an `Error`
    /// token, so the statement around it cannot parse.
    fn reject(&mut self, diagnostics: &mut Diagnostics, message: &str) {
        diagnostics.report(
            ErrorKind::Lexical,
            self.line,
            "",
            message,
            Span::new(self.start, self.current),
        );
        self.add_token(TokenType::Error);
    }

    fn add_token(&mut self, token_type: TokenType) {
        let token = self.make_token(token_type);
        self.tokens.push(token);
    }

    fn add_literal_token(&mut self, token_type: TokenType, literal: Literal) {
        let token = self.make_token(token_type).with_literal(literal);
        self.tokens.push(token);
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token::new(
            token_type,
            &self.source[self.start..self.current],
            self.line,
            Span::new(self.start, self.current),
        )
    }
}
