//! Leaf nodes: identifiers, literals, entity ids, truth values and NULL.
//!
//! Leaves have no children. They are the only nodes that decide whether they
//! carry quotes; every composite node asks its leaves.

use core::fmt;

use crate::error::{Result, TreeError};
use crate::render::ToSqlParameters;

/// Maximum number of characters accepted in a character string literal.
pub const MAX_CHARACTER_STRING_LENGTH: usize = 524_288;

/// The quote character around a delimited identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `` `name` ``
    Backtick,
    /// `"name"`
    DoubleQuote,
}

impl Delimiter {
    #[must_use]
    pub const fn quote(&self) -> char {
        match self {
            Self::Backtick => '`',
            Self::DoubleQuote => '"',
        }
    }
}

/// An identifier: a column, table, alias or CTE name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Unquoted identifier.
    Regular(String),
    /// Quoted identifier.
    Delimited {
        /// The identifier with escapes removed.
        value: String,
        /// The quote character.
        delimiter: Delimiter,
    },
}

impl Identifier {
    /// Builds an identifier from exactly one of its two forms.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ConflictingIdentifier`] when both forms are given
    /// and [`TreeError::MissingIdentifier`] when neither is.
    pub fn new(regular: Option<String>, delimited: Option<(String, Delimiter)>) -> Result<Self> {
        match (regular, delimited) {
            (Some(_), Some(_)) => Err(TreeError::ConflictingIdentifier),
            (None, None) => Err(TreeError::MissingIdentifier),
            (Some(name), None) => Ok(Self::Regular(name)),
            (None, Some((value, delimiter))) => Ok(Self::Delimited { value, delimiter }),
        }
    }

    #[must_use]
    pub fn regular(name: impl Into<String>) -> Self {
        Self::Regular(name.into())
    }

    #[must_use]
    pub fn backtick(value: impl Into<String>) -> Self {
        Self::Delimited {
            value: value.into(),
            delimiter: Delimiter::Backtick,
        }
    }

    #[must_use]
    pub fn double_quoted(value: impl Into<String>) -> Self {
        Self::Delimited {
            value: value.into(),
            delimiter: Delimiter::DoubleQuote,
        }
    }

    /// Returns the name without quotes or escapes.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Regular(name) => name,
            Self::Delimited { value, .. } => value,
        }
    }

    #[must_use]
    pub const fn has_quotes(&self) -> bool {
        matches!(self, Self::Delimited { .. })
    }

    pub(crate) fn write_sql(&self, out: &mut String, parameters: &ToSqlParameters) {
        match self {
            Self::Regular(name) => out.push_str(name),
            Self::Delimited { value, delimiter } => {
                if parameters.include_quotes {
                    write_quoted(out, value, delimiter.quote());
                } else {
                    out.push_str(value);
                }
            }
        }
    }
}

/// A validated character string value.
///
/// The length limit is checked when the value is built so an oversized
/// literal never makes it into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterString(String);

impl CharacterString {
    /// # Errors
    ///
    /// Returns [`TreeError::StringLiteralTooLarge`] when the value has more
    /// than [`MAX_CHARACTER_STRING_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let length = value.chars().count();
        if length > MAX_CHARACTER_STRING_LENGTH {
            return Err(TreeError::StringLiteralTooLarge {
                length,
                max: MAX_CHARACTER_STRING_LENGTH,
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `'text'`
    String(CharacterString),
    /// `42`
    Integer(i64),
    /// `4.2`
    Decimal(f64),
    /// `:name`, a value supplied out of band.
    Bind(String),
}

impl Literal {
    /// Builds a string literal.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StringLiteralTooLarge`] for oversized values.
    pub fn string(value: impl Into<String>) -> Result<Self> {
        CharacterString::new(value).map(Self::String)
    }

    #[must_use]
    pub const fn has_quotes(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns the literal text without quotes.
    #[must_use]
    pub fn unquoted(&self) -> String {
        match self {
            Self::String(s) => s.value().to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Decimal(f) => format!("{f:?}"),
            Self::Bind(name) => format!(":{name}"),
        }
    }

    pub(crate) fn write_sql(&self, out: &mut String, parameters: &ToSqlParameters) {
        match self {
            Self::String(s) if parameters.include_quotes => write_quoted(out, s.value(), '\''),
            _ => out.push_str(&self.unquoted()),
        }
    }
}

/// A reference to a table by entity id, e.g. `syn123` or `syn123.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub id: u64,
    pub version: Option<u64>,
}

impl EntityId {
    #[must_use]
    pub const fn new(id: u64, version: Option<u64>) -> Self {
        Self { id, version }
    }

    /// Parses `syn123`, `SYN123` or `syn123.4`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text
            .get(..3)
            .filter(|prefix| prefix.eq_ignore_ascii_case("syn"))
            .map(|_| &text[3..])?;
        let (id, version) = match digits.split_once('.') {
            Some((id, version)) => (id, Some(version.parse().ok()?)),
            None => (digits, None),
        };
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::new(id.parse().ok()?, version))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syn{}", self.id)?;
        if let Some(version) = self.version {
            write!(f, ".{version}")?;
        }
        Ok(())
    }
}

/// `TRUE`, `FALSE` or `UNKNOWN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruthValue {
    True,
    False,
    Unknown,
}

impl TruthValue {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// The `NULL` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NullSpecification;

fn write_quoted(out: &mut String, value: &str, quote: char) {
    out.push(quote);
    for c in value.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_literal(literal: &Literal, parameters: &ToSqlParameters) -> String {
        let mut out = String::new();
        literal.write_sql(&mut out, parameters);
        out
    }

    fn render_identifier(identifier: &Identifier, parameters: &ToSqlParameters) -> String {
        let mut out = String::new();
        identifier.write_sql(&mut out, parameters);
        out
    }

    #[test]
    fn test_identifier_requires_exactly_one_form() {
        assert_eq!(
            Identifier::new(Some("a".into()), Some(("b".into(), Delimiter::Backtick))),
            Err(TreeError::ConflictingIdentifier)
        );
        assert_eq!(Identifier::new(None, None), Err(TreeError::MissingIdentifier));
        assert_eq!(
            Identifier::new(Some("a".into()), None),
            Ok(Identifier::regular("a"))
        );
    }

    #[test]
    fn test_string_escape() {
        let literal = Literal::string("O'Brien").unwrap();
        assert_eq!(render_literal(&literal, &ToSqlParameters::WITH_QUOTES), "'O''Brien'");
        assert_eq!(render_literal(&literal, &ToSqlParameters::WITHOUT_QUOTES), "O'Brien");
    }

    #[test]
    fn test_backtick_escape() {
        let identifier = Identifier::backtick("a`b");
        assert_eq!(render_identifier(&identifier, &ToSqlParameters::WITH_QUOTES), "`a``b`");
        assert_eq!(render_identifier(&identifier, &ToSqlParameters::WITHOUT_QUOTES), "a`b");
    }

    #[test]
    fn test_double_quote_escape() {
        let identifier = Identifier::double_quoted("colWith\"Quotes\"InIt");
        assert_eq!(
            render_identifier(&identifier, &ToSqlParameters::WITH_QUOTES),
            "\"colWith\"\"Quotes\"\"InIt\""
        );
    }

    #[test]
    fn test_string_too_large() {
        let value = "x".repeat(MAX_CHARACTER_STRING_LENGTH + 1);
        assert_eq!(
            Literal::string(value),
            Err(TreeError::StringLiteralTooLarge {
                length: MAX_CHARACTER_STRING_LENGTH + 1,
                max: MAX_CHARACTER_STRING_LENGTH,
            })
        );
        assert!(Literal::string("x".repeat(MAX_CHARACTER_STRING_LENGTH)).is_ok());
    }

    #[test]
    fn test_numbers_have_no_quotes() {
        assert!(!Literal::Integer(1).has_quotes());
        assert_eq!(render_literal(&Literal::Decimal(1.5), &ToSqlParameters::WITH_QUOTES), "1.5");
        assert_eq!(render_literal(&Literal::Decimal(2.0), &ToSqlParameters::WITH_QUOTES), "2.0");
        assert_eq!(render_literal(&Literal::Bind("b0".into()), &ToSqlParameters::WITH_QUOTES), ":b0");
    }

    #[test]
    fn test_entity_id_parse() {
        assert_eq!(EntityId::parse("syn123"), Some(EntityId::new(123, None)));
        assert_eq!(EntityId::parse("SYN123.4"), Some(EntityId::new(123, Some(4))));
        assert_eq!(EntityId::parse("syn"), None);
        assert_eq!(EntityId::parse("synapse"), None);
        assert_eq!(EntityId::parse("T123"), None);
        assert_eq!(EntityId::new(123, Some(4)).to_string(), "syn123.4");
    }
}
