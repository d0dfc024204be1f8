use crate::ast::LiteralType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: keyword, identifier or type name
    Word,
    /// `[name]` or `"name"`
    QuotedIdentifier,
    String,
    /// `N'...'`
    UnicodeString,
    Integer,
    Numeric,
    Real,
    /// `0x...`
    Binary,
    /// `$1.50`
    Money,
    /// `@name` or `@@name`
    Variable,
    LeftParen,
    RightParen,
    Comma,
    Dot,
    Semicolon,
    Operator,
    /// `::` in `SCHEMA::name` securables
    DoubleColon,
    /// SQLCMD `$(name)`
    SqlCmdVariable,
    /// Any character the scanner has no rule for
    Other,
}

impl TokenKind {
    pub fn literal_type(&self) -> Option<LiteralType> {
        match self {
            TokenKind::Integer => Some(LiteralType::Integer),
            TokenKind::Numeric => Some(LiteralType::Numeric),
            TokenKind::Real => Some(LiteralType::Real),
            TokenKind::String => Some(LiteralType::String),
            TokenKind::UnicodeString => Some(LiteralType::UnicodeString),
            TokenKind::Binary => Some(LiteralType::Binary),
            TokenKind::Money => Some(LiteralType::Money),
            _ => None,
        }
    }
}

/// A token and where it sits in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub line: usize,
}

impl<'a> Token<'a> {
    /// Case-insensitive keyword match on a bare word.
    pub fn is_word(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_any_word(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.is_word(keyword))
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::QuotedIdentifier)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == operator
    }

    /// Identifier with delimiters removed and doubled closing delimiters collapsed.
    pub fn identifier(&self) -> String {
        if self.kind != TokenKind::QuotedIdentifier || self.text.len() < 2 {
            return self.text.to_string();
        }
        let inner = &self.text[1..self.text.len() - 1];
        if self.text.starts_with('[') {
            inner.replace("]]", "]")
        } else {
            inner.replace("\"\"", "\"")
        }
    }

    /// Literal value: unquoted content for strings, the raw text otherwise.
    pub fn literal_value(&self) -> String {
        let quoted = match self.kind {
            TokenKind::String => self.text,
            TokenKind::UnicodeString => &self.text[1..],
            _ => return self.text.to_string(),
        };
        if quoted.len() < 2 {
            return String::new();
        }
        quoted[1..quoted.len() - 1].replace("''", "'")
    }
}
