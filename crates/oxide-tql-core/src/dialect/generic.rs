//! Generic SQL dialect.

use super::Dialect;

/// The dialect queries are written in: double-quoted identifiers and no
/// native form of the list and full-text extensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Delimiter;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.identifier_delimiter(), Delimiter::DoubleQuote);
        assert_eq!(dialect.identifier_quote(), '"');
        assert!(!dialect.supports_json_table());
        assert!(!dialect.supports_match_against());
    }
}
