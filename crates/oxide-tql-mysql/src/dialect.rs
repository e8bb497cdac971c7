//! MySQL dialect implementation.

use oxide_tql_core::ast::Delimiter;
use oxide_tql_core::dialect::Dialect;

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_delimiter(&self) -> Delimiter {
        Delimiter::Backtick // double quotes are string literals under default sql_mode
    }

    fn supports_json_table(&self) -> bool {
        true // MySQL 8.0.4+
    }

    fn supports_match_against(&self) -> bool {
        true
    }
}
