use std::fmt;

use crate::error::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Integer,
    Float,

    // Keywords
    And,
    Class,
    Const,
    Else,
    False,
    For,
    Function,
    If,
    Let,
    Null,
    Or,
    Print,
    Return,
    SelfKw,
    Super,
    True,
    Var,
    While,

    // Special
    Comment,
    /// A lexeme the lexer rejected. It has already been reported, and no
    /// grammar rule accepts it.
    Error,
    Eof,
}

impl TokenType {
    /// Looks `text` up in the keyword table.
    pub fn keyword(text: &str) -> Option<TokenType> {
        let token_type = match text {
            "and" => TokenType::And,
            "class" => TokenType::Class,
            "const" => TokenType::Const,
            "else" => TokenType::Else,
            "false" => TokenType::False,
            "for" => TokenType::For,
            "function" => TokenType::Function,
            "if" => TokenType::If,
            "let" => TokenType::Let,
            "null" => TokenType::Null,
            "or" => TokenType::Or,
            "print" => TokenType::Print,
            "return" => TokenType::Return,
            "self" => TokenType::SelfKw,
            "super" => TokenType::Super,
            "true" => TokenType::True,
            "var" => TokenType::Var,
            "while" => TokenType::While,
            _ => return None,
        };
        Some(token_type)
    }

    /// Keywords the parser treats as the start of a new statement when
    /// recovering from an error.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenType::Class
                | TokenType::Function
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return
        )
    }
}

/// Value carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, line: usize, span: Span) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            literal: None,
            line,
            span,
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// A token that does not come from any source text, for nodes built by
    /// hand (tests, tools).
    pub fn synthetic(token_type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
        Self::new(token_type, lexeme, line, Span::new(0, 0))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{:?} {} {}", self.token_type, self.lexeme, literal),
            None => write!(f, "{:?} {}", self.token_type, self.lexeme),
        }
    }
}
