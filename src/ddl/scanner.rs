use super::token::{Token, TokenKind};
use super::ParseError;

/// Splits T-SQL source into tokens, dropping whitespace and comments.
pub struct Scanner<'a> {
    input: &'a str,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            current: 0,
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.current..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match (self.peek(), self.peek_next()) {
                // U+FEFF: byte-order mark left at the start of SSMS/SSDT files
                (Some(c), _) if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                (Some('-'), Some('-')) => self.bump_while(|c| c != '\n'),
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Block comments nest in T-SQL.
    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.bump();
        self.bump();
        let mut depth = 1;
        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (Some('/'), Some('*')) => {
                    self.bump();
                    self.bump();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.bump();
                    self.bump();
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => return Err(ParseError::new(line, "unterminated comment")),
            }
        }
        Ok(())
    }

    /// Consume a delimited run; a doubled closing delimiter is an escape.
    fn read_delimited(&mut self, close: char, what: &str) -> Result<(), ParseError> {
        let line = self.line;
        self.bump();
        loop {
            match self.bump() {
                Some(c) if c == close => {
                    if self.peek() == Some(close) {
                        self.bump();
                    } else {
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(ParseError::new(line, format!("unterminated {}", what))),
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Integer;
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            kind = TokenKind::Numeric;
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let exponent = match self.peek_next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.input[self.current..]
                    .chars()
                    .nth(2)
                    .is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent {
                kind = TokenKind::Real;
                self.bump();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.bump();
                }
                self.bump_while(|c| c.is_ascii_digit());
            }
        }
        kind
    }

    /// `$(name)`. Without a closing `)` on the same line only the `$` is taken.
    fn read_sqlcmd_variable(&mut self) -> TokenKind {
        let rest = &self.input[self.current..];
        let closed = rest
            .find(|c: char| c == ')' || c == '\n')
            .filter(|&index| rest[index..].starts_with(')'));
        match closed {
            Some(index) => {
                let end = self.current + index + 1;
                while self.current < end {
                    self.bump();
                }
                TokenKind::SqlCmdVariable
            }
            None => {
                self.bump();
                TokenKind::Other
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        self.skip_trivia()?;

        let start = self.current;
        let line = self.line;
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let next = self.peek_next();

        let kind = match c {
            '[' => {
                self.read_delimited(']', "bracketed identifier")?;
                TokenKind::QuotedIdentifier
            }
            '"' => {
                self.read_delimited('"', "quoted identifier")?;
                TokenKind::QuotedIdentifier
            }
            '\'' => {
                self.read_delimited('\'', "string literal")?;
                TokenKind::String
            }
            'N' | 'n' if next == Some('\'') => {
                self.bump();
                self.read_delimited('\'', "string literal")?;
                TokenKind::UnicodeString
            }
            '0' if matches!(next, Some('x') | Some('X')) => {
                self.bump();
                self.bump();
                self.bump_while(|c| c.is_ascii_hexdigit());
                TokenKind::Binary
            }
            '$' if next.is_some_and(|n| n.is_ascii_digit() || n == '.') => {
                self.bump();
                self.read_number();
                TokenKind::Money
            }
            '$' if next == Some('(') => self.read_sqlcmd_variable(),
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            '@' => {
                self.bump();
                self.bump_while(is_word_char);
                TokenKind::Variable
            }
            c if is_word_start(c) => {
                self.bump_while(is_word_char);
                TokenKind::Word
            }
            '(' | ')' | ',' | '.' | ';' => {
                self.bump();
                match c {
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    _ => TokenKind::Semicolon,
                }
            }
            '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' => {
                self.bump();
                if matches!(c, '<' | '>' | '!') && matches!(next, Some('=') | Some('>') | Some('<'))
                {
                    self.bump();
                }
                TokenKind::Operator
            }
            ':' if next == Some(':') => {
                self.bump();
                self.bump();
                TokenKind::DoubleColon
            }
            // Left for the grammar to reject; skipped statements may contain anything
            _ => {
                self.bump();
                TokenKind::Other
            }
        };

        Ok(Some(Token {
            kind,
            text: &self.input[start..self.current],
            start,
            end: self.current,
            line,
        }))
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '#'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '#' | '@' | '$')
}
