use minic_core::Location;
use serde::Serialize;

pub trait IntoToken {
    fn into_token(self, location: Location) -> Token;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    Number,
    StringLiteral,
    Operator(Operator),
    Delimiter(Delimiter),
    Error(LexError),
    Eof,
}

impl IntoToken for TokenKind {
    fn into_token(self, location: Location) -> Token {
        Token(self, location)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    Int,
    Float,
    String,
    Void,
    If,
    Else,
    While,
    For,
    Return,
    Break,
    Continue,
}

impl Keyword {
    pub fn lookup(lexeme: &str) -> Option<Keyword> {
        let keyword = match lexeme {
            "int" => Keyword::Int,
            "float" => Keyword::Float,
            "string" => Keyword::String,
            "void" => Keyword::Void,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "for" => Keyword::For,
            "return" => Keyword::Return,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            _ => return None,
        };

        Some(keyword)
    }

    /// Whether this keyword can open a variable declaration.
    pub fn is_type(self) -> bool {
        matches!(self, Keyword::Int | Keyword::Float | Keyword::String)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Int => "int",
            Keyword::Float => "float",
            Keyword::String => "string",
            Keyword::Void => "void",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::For => "for",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IntoToken for Keyword {
    fn into_token(self, location: Location) -> Token {
        Token(TokenKind::Keyword(self), location)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Mul,
    Div,
    Assign,
    GreaterThan,
    LessThan,
    Not,
    Amp,
    Pipe,
    EqualEqual,
    NotEqual,
    GreaterThanOrEqual,
    LessThanOrEqual,
    And,
    Or,
    PlusEqual,
    MinusEqual,
    MulEqual,
    DivEqual,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Assign => "=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Not => "!",
            Operator::Amp => "&",
            Operator::Pipe => "|",
            Operator::EqualEqual => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::PlusEqual => "+=",
            Operator::MinusEqual => "-=",
            Operator::MulEqual => "*=",
            Operator::DivEqual => "/=",
        }
    }
}

impl IntoToken for Operator {
    fn into_token(self, location: Location) -> Token {
        Token(TokenKind::Operator(self), location)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Delimiter {
    LParen,
    RParen,
    LCurly,
    RCurly,
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::LParen => "(",
            Delimiter::RParen => ")",
            Delimiter::LCurly => "{",
            Delimiter::RCurly => "}",
            Delimiter::Comma => ",",
            Delimiter::Semicolon => ";",
        }
    }
}

impl IntoToken for Delimiter {
    fn into_token(self, location: Location) -> Token {
        Token(TokenKind::Delimiter(self), location)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LexError {
    UnterminatedString,
    UnterminatedComment,
    MalformedNumber,
    UnexpectedChar,
}

impl LexError {
    pub fn description(self) -> &'static str {
        match self {
            LexError::UnterminatedString => "unterminated string literal",
            LexError::UnterminatedComment => "unterminated block comment",
            LexError::MalformedNumber => "malformed numeric literal",
            LexError::UnexpectedChar => "unrecognized character",
        }
    }
}

impl IntoToken for LexError {
    fn into_token(self, location: Location) -> Token {
        Token(TokenKind::Error(self), location)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Token(pub TokenKind, pub Location);

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.0
    }

    pub fn location(&self) -> Location {
        self.1
    }

    pub fn text<'src>(&self, content: &'src str) -> &'src str {
        &content[self.1.to_range()]
    }
}

/// Forward cursor over a lexed token sequence. Reading past the end yields an
/// `Eof` sentinel instead of panicking, so parser loops must check for `Eof`
/// explicitly rather than waiting for a token they may never see.
#[derive(Debug)]
pub struct Tokens {
    inner: Vec<Token>,
    index: usize,
    eof: Location,
}

impl Tokens {
    pub fn new(inner: Vec<Token>, eof_byte: usize) -> Self {
        let line = inner.last().map(|t| t.location().line).unwrap_or(1);

        Self {
            inner,
            index: 0,
            eof: Location::new(eof_byte, eof_byte, line),
        }
    }

    pub fn next_token(&mut self) -> Token {
        match self.inner.get(self.index).copied() {
            Some(token) => {
                self.index += 1;
                token
            }
            None => Token(TokenKind::Eof, self.eof),
        }
    }

    pub fn consume(&mut self) {
        self.index += 1;
    }

    pub fn peek(&self) -> Token {
        self.peek_at(0)
    }

    pub fn peek_at(&self, offset: usize) -> Token {
        self.inner
            .get(self.index + offset)
            .copied()
            .unwrap_or(Token(TokenKind::Eof, self.eof))
    }
}
