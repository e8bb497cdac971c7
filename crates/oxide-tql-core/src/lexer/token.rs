//! Tokens, keywords and source spans.

use crate::ast::Delimiter;

/// A byte range of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First byte (inclusive).
    pub start: usize,
    /// Last byte (exclusive).
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the smallest span covering both.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Reserved words of the dialect.
///
/// Function names (`COUNT`, `UNNEST`, `TEXT_MATCHES`, ...) are not keywords;
/// the parser recognizes them as identifiers followed by `(`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Query structure
    Select,
    From,
    Where,
    Group,
    Order,
    By,
    Limit,
    Offset,
    Distinct,
    All,
    As,
    With,
    Union,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Outer,
    Cross,
    On,

    // Predicates
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Escape,
    Is,
    Null,
    True,
    False,
    Unknown,
    Exists,
    Has,
    HasLike,

    // Ordering
    Asc,
    Desc,

    // Expressions
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
}

impl Keyword {
    const ALL: [Self; 43] = [
        Self::Select,
        Self::From,
        Self::Where,
        Self::Group,
        Self::Order,
        Self::By,
        Self::Limit,
        Self::Offset,
        Self::Distinct,
        Self::All,
        Self::As,
        Self::With,
        Self::Union,
        Self::Join,
        Self::Inner,
        Self::Left,
        Self::Right,
        Self::Outer,
        Self::Cross,
        Self::On,
        Self::And,
        Self::Or,
        Self::Not,
        Self::In,
        Self::Between,
        Self::Like,
        Self::Escape,
        Self::Is,
        Self::Null,
        Self::True,
        Self::False,
        Self::Unknown,
        Self::Exists,
        Self::Has,
        Self::HasLike,
        Self::Asc,
        Self::Desc,
        Self::Case,
        Self::When,
        Self::Then,
        Self::Else,
        Self::End,
        Self::Cast,
    ];

    /// Looks a keyword up, ignoring case.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(s))
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::As => "AS",
            Self::With => "WITH",
            Self::Union => "UNION",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::On => "ON",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Escape => "ESCAPE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unknown => "UNKNOWN",
            Self::Exists => "EXISTS",
            Self::Has => "HAS",
            Self::HasLike => "HAS_LIKE",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
        }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Integer(i64),
    Float(f64),
    /// `'text'` with `''` escapes removed.
    String(String),

    // Names
    Identifier(String),
    /// `` `name` `` or `"name"` with doubled delimiters removed.
    DelimitedIdentifier {
        value: String,
        delimiter: Delimiter,
    },
    Keyword(Keyword),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    /// `<>` or `!=`
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Punctuation
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,
    Colon,

    Eof,
    /// A lexing failure with its message.
    Error(String),
}

/// A token and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(keyword) => Some(*keyword),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_ignores_case() {
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("Has_Like"), Some(Keyword::HasLike));
        assert_eq!(Keyword::from_str("genes"), None);
    }

    #[test]
    fn test_every_keyword_round_trips() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_str(keyword.as_str()), Some(keyword));
        }
    }

    #[test]
    fn test_span_merge() {
        assert_eq!(Span::new(5, 10).merge(Span::new(2, 7)), Span::new(2, 10));
        assert_eq!(Span::new(3, 8).len(), 5);
        assert!(Span::default().is_empty());
    }

    #[test]
    fn test_token_as_keyword() {
        let token = Token::new(TokenKind::Keyword(Keyword::Has), Span::new(0, 3));
        assert_eq!(token.as_keyword(), Some(Keyword::Has));
        assert!(!token.is_eof());
    }
}
