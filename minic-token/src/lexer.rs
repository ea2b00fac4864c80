use std::iter::Peekable;
use std::str::CharIndices;

use minic_core::Location;

use crate::token::{Delimiter, IntoToken, Keyword, LexError, Operator, Token, TokenKind};

pub struct Lexer<'lex> {
    chars: Peekable<CharIndices<'lex>>,
    content: &'lex str,
    line: u32,
}

impl<'lex> Lexer<'lex> {
    pub fn new(content: &'lex str) -> Self {
        Self {
            chars: content.char_indices().peekable(),
            content,
            line: 1,
        }
    }

    fn next_token(&mut self) -> Token {
        loop {
            let (index, curr) = loop {
                match self.chars.next() {
                    None => return self.eof(),
                    Some((_, '\n')) => self.line += 1,
                    Some((_, c)) if c.is_whitespace() => {}
                    Some(curr) => break curr,
                }
            };

            let next = self.chars.peek().map(|(_, c)| *c);

            return match (curr, next) {
                ('/', Some('/')) => {
                    self.chars.next(); // consume the second slash
                    loop {
                        // leave the newline for the whitespace scan so the
                        // line counter stays right
                        if let Some((_, '\n')) | None = self.chars.peek() {
                            break;
                        }
                        self.chars.next();
                    }
                    continue;
                }
                ('/', Some('*')) => match self.lex_block_comment(index) {
                    Some(token) => token,
                    None => continue,
                },

                ('=', Some('=')) => self.two_char(Operator::EqualEqual, index),
                ('!', Some('=')) => self.two_char(Operator::NotEqual, index),
                ('<', Some('=')) => self.two_char(Operator::LessThanOrEqual, index),
                ('>', Some('=')) => self.two_char(Operator::GreaterThanOrEqual, index),
                ('&', Some('&')) => self.two_char(Operator::And, index),
                ('|', Some('|')) => self.two_char(Operator::Or, index),
                ('+', Some('=')) => self.two_char(Operator::PlusEqual, index),
                ('-', Some('=')) => self.two_char(Operator::MinusEqual, index),
                ('*', Some('=')) => self.two_char(Operator::MulEqual, index),
                ('/', Some('=')) => self.two_char(Operator::DivEqual, index),

                ('+', _) => Operator::Plus.into_token(self.span(index, index + 1)),
                ('-', _) => Operator::Minus.into_token(self.span(index, index + 1)),
                ('*', _) => Operator::Mul.into_token(self.span(index, index + 1)),
                ('/', _) => Operator::Div.into_token(self.span(index, index + 1)),
                ('=', _) => Operator::Assign.into_token(self.span(index, index + 1)),
                ('>', _) => Operator::GreaterThan.into_token(self.span(index, index + 1)),
                ('<', _) => Operator::LessThan.into_token(self.span(index, index + 1)),
                ('!', _) => Operator::Not.into_token(self.span(index, index + 1)),
                ('&', _) => Operator::Amp.into_token(self.span(index, index + 1)),
                ('|', _) => Operator::Pipe.into_token(self.span(index, index + 1)),

                ('(', _) => Delimiter::LParen.into_token(self.span(index, index + 1)),
                (')', _) => Delimiter::RParen.into_token(self.span(index, index + 1)),
                ('{', _) => Delimiter::LCurly.into_token(self.span(index, index + 1)),
                ('}', _) => Delimiter::RCurly.into_token(self.span(index, index + 1)),
                (',', _) => Delimiter::Comma.into_token(self.span(index, index + 1)),
                (';', _) => Delimiter::Semicolon.into_token(self.span(index, index + 1)),

                ('a'..='z' | 'A'..='Z' | '_', _) => self.lex_identifier(index),
                ('0'..='9', _) => self.lex_number(index),
                ('"' | '\'', _) => self.lex_string(curr, index),

                _ => LexError::UnexpectedChar
                    .into_token(self.span(index, index + curr.len_utf8())),
            };
        }
    }

    fn span(&self, start_byte: usize, end_byte: usize) -> Location {
        Location::new(start_byte, end_byte, self.line)
    }

    fn eof(&self) -> Token {
        let len = self.content.len();
        TokenKind::Eof.into_token(Location::new(len, len, self.line))
    }

    fn two_char(&mut self, op: Operator, start_byte: usize) -> Token {
        self.chars.next(); // the pair was confirmed by lookahead
        op.into_token(self.span(start_byte, start_byte + 2))
    }

    /// Returns `None` when the comment closes normally, or the error token
    /// when input runs out before `*/`.
    fn lex_block_comment(&mut self, start_byte: usize) -> Option<Token> {
        let start_line = self.line;
        self.chars.next(); // consume the '*'

        while let Some((_, c)) = self.chars.next() {
            match c {
                '\n' => self.line += 1,
                '*' => {
                    if let Some((_, '/')) = self.chars.peek() {
                        self.chars.next();
                        return None;
                    }
                }
                _ => {}
            }
        }

        Some(LexError::UnterminatedComment.into_token(Location::new(
            start_byte,
            self.content.len(),
            start_line,
        )))
    }

    fn lex_identifier(&mut self, start_byte: usize) -> Token {
        let mut end_byte = start_byte + 1;
        while let Some((e, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')) = self.chars.peek() {
            end_byte = *e + 1;
            self.chars.next();
        }

        let location = self.span(start_byte, end_byte);
        match Keyword::lookup(&self.content[start_byte..end_byte]) {
            Some(keyword) => keyword.into_token(location),
            None => TokenKind::Identifier.into_token(location),
        }
    }

    fn lex_number(&mut self, start_byte: usize) -> Token {
        let mut end_byte = start_byte + 1;
        while let Some((e, '0'..='9' | '.')) = self.chars.peek() {
            end_byte = *e + 1;
            self.chars.next();
        }

        // greedy consumption can swallow more dots than a literal allows;
        // the whole malformed lexeme becomes one error token
        let location = self.span(start_byte, end_byte);
        match is_number(&self.content[start_byte..end_byte]) {
            true => TokenKind::Number.into_token(location),
            false => LexError::MalformedNumber.into_token(location),
        }
    }

    fn lex_string(&mut self, delimiter: char, start_byte: usize) -> Token {
        loop {
            match self.chars.peek().copied() {
                Some((end_byte, c)) if c == delimiter => {
                    self.chars.next();
                    break TokenKind::StringLiteral.into_token(self.span(start_byte, end_byte + 1));
                }
                Some((end_byte, '\n')) => {
                    // leave the newline for the whitespace scan so the next
                    // line keeps lexing normally
                    break LexError::UnterminatedString
                        .into_token(self.span(start_byte, end_byte));
                }
                Some(_) => {
                    self.chars.next();
                }
                None => {
                    break LexError::UnterminatedString
                        .into_token(self.span(start_byte, self.content.len()));
                }
            }
        }
    }
}

/// One or more digits optionally followed by `.` and any further digits, or
/// `.` followed by one or more digits.
fn is_number(lexeme: &str) -> bool {
    fn all_digits(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    match lexeme.split_once('.') {
        None => all_digits(lexeme),
        Some((_, frac)) if frac.contains('.') => false,
        Some((int_part, "")) => all_digits(int_part),
        Some(("", frac)) => all_digits(frac),
        Some((int_part, frac)) => all_digits(int_part) && all_digits(frac),
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token(TokenKind::Eof, _) => None,
            token => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(content: &str) -> Vec<Token> {
        Lexer::new(content).collect()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind()).collect()
    }

    fn texts<'src>(tokens: &[Token], content: &'src str) -> Vec<&'src str> {
        tokens.iter().map(|t| t.text(content)).collect()
    }

    #[test]
    fn test_global_declaration() {
        let content = "int x = 5;";
        let tokens = lex(content);

        insta::assert_snapshot!(
            format!("{:?}", kinds(&tokens)),
            @"[Keyword(Int), Identifier, Operator(Assign), Number, Delimiter(Semicolon)]"
        );
        assert_eq!(texts(&tokens, content), ["int", "x", "=", "5", ";"]);
        assert!(tokens.iter().all(|t| t.location().line == 1));
    }

    #[test]
    fn test_two_char_operators_lex_as_one_token() {
        let content = "a >= b";
        let tokens = lex(content);

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind(), TokenKind::Operator(Operator::GreaterThanOrEqual));
        assert_eq!(tokens[1].text(content), ">=");
    }

    #[test]
    fn test_all_compound_operators() {
        let content = "== != <= >= && || += -= *= /=";
        let tokens = lex(content);

        assert_eq!(tokens.len(), 10);
        for token in &tokens {
            assert!(matches!(token.kind(), TokenKind::Operator(_)));
            assert_eq!(token.text(content).len(), 2);
        }
    }

    #[test]
    fn test_single_char_operators() {
        let content = "a & b | c ! d";
        let tokens = lex(content);

        assert_eq!(tokens[1].kind(), TokenKind::Operator(Operator::Amp));
        assert_eq!(tokens[3].kind(), TokenKind::Operator(Operator::Pipe));
        assert_eq!(tokens[5].kind(), TokenKind::Operator(Operator::Not));
    }

    #[test]
    fn test_unterminated_string_recovers_on_next_line() {
        let content = "x = \"abc\nint y;";
        let tokens = lex(content);

        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator(Operator::Assign),
                TokenKind::Error(LexError::UnterminatedString),
                TokenKind::Keyword(Keyword::Int),
                TokenKind::Identifier,
                TokenKind::Delimiter(Delimiter::Semicolon),
            ]
        );
        assert_eq!(tokens[2].text(content), "\"abc");
        assert_eq!(tokens[2].location().line, 1);
        assert_eq!(tokens[4].text(content), "y");
        assert_eq!(tokens[4].location().line, 2);
    }

    #[test]
    fn test_char_literal() {
        let content = "'a'";
        let tokens = lex(content);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::StringLiteral);
        assert_eq!(tokens[0].text(content), "'a'");
    }

    #[test]
    fn test_malformed_number_is_one_error_token() {
        let content = "12.3.4";
        let tokens = lex(content);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Error(LexError::MalformedNumber));
        assert_eq!(tokens[0].text(content), "12.3.4");
    }

    #[test]
    fn test_trailing_dot_number_is_valid() {
        let content = "5. 1.25";
        let tokens = lex(content);

        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Number]);
    }

    #[test]
    fn test_comments_are_discarded() {
        let content = "int a; // trailing\n/* block\nstill */ float b;";
        let tokens = lex(content);

        assert_eq!(texts(&tokens, content), ["int", "a", ";", "float", "b", ";"]);
        assert_eq!(tokens[4].location().line, 3);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let content = "int a; /* never closed";
        let tokens = lex(content);

        let last = tokens.last().unwrap();
        assert_eq!(last.kind(), TokenKind::Error(LexError::UnterminatedComment));
        assert_eq!(last.text(content), "/* never closed");
    }

    #[test]
    fn test_unexpected_character() {
        let content = "int #;";
        let tokens = lex(content);

        assert_eq!(tokens[1].kind(), TokenKind::Error(LexError::UnexpectedChar));
        assert_eq!(tokens[1].text(content), "#");
    }

    #[test]
    fn test_empty_input() {
        assert!(lex("").is_empty());
    }

    #[test]
    fn test_token_round_trip() {
        let content = r#"
int total = 0;

void count(int limit) {
    // keep going
    for (int i = 0; i < limit; i += 1) {
        total = total + i;
    }
    string label = "done";
}
"#;
        let tokens = lex(content);
        let joined = tokens
            .iter()
            .map(|t| t.text(content))
            .collect::<Vec<_>>()
            .join(" ");
        let relexed = lex(&joined);

        assert_eq!(kinds(&tokens), kinds(&relexed));
    }
}
