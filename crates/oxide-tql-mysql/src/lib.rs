//! # oxide-tql-mysql
//!
//! MySQL translation for `oxide-tql-core` queries.
//!
//! # How MySQL differs from the table-query dialect
//!
//! - **List columns**: MySQL has no array type. List values are stored as
//!   JSON arrays and unnested with [`JSON_TABLE`] (since MySQL 8.0.4), so
//!   `HAS`, `HAS_LIKE` and `UNNEST` become `JSON_TABLE` subqueries and joins.
//! - **Full-text search**: `TEXT_MATCHES(v)` becomes
//!   [`MATCH(...) AGAINST(...)`] over one indexed search column.
//! - **Identifier quoting**: MySQL quotes identifiers with backticks;
//!   double quotes delimit strings under the default [SQL mode].
//! - **Physical names**: tables and columns are stored under generated
//!   names, resolved through a [`SchemaLookup`].
//!
//! [`JSON_TABLE`]: https://dev.mysql.com/doc/refman/8.0/en/json-table-functions.html
//! [`MATCH(...) AGAINST(...)`]: https://dev.mysql.com/doc/refman/8.0/en/fulltext-search.html
//! [SQL mode]: https://dev.mysql.com/doc/refman/8.0/en/sql-mode.html#sqlmode_ansi_quotes
//!
//! ## Example
//!
//! ```rust
//! use oxide_tql_core::types::ColumnType;
//! use oxide_tql_core::SqlValue;
//! use oxide_tql_mysql::{translate_sql, ColumnTranslation, MappedSchema, TranslationConfig};
//!
//! let schema = MappedSchema::new()
//!     .with_column("tags", ColumnTranslation::new("_C1_", ColumnType::StringList))
//!     .with_table("syn123", "T123");
//! let query = translate_sql(
//!     "select * from syn123 where tags has ('a')",
//!     &schema,
//!     &TranslationConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM T123 WHERE EXISTS (SELECT 1 FROM JSON_TABLE(_C1_, '$[*]' \
//!      COLUMNS(_C1__UNNEST VARCHAR(50) PATH '$' ERROR ON ERROR)) AS J0 \
//!      WHERE _C1__UNNEST IN (:b0))"
//! );
//! assert_eq!(query.parameters["b0"], SqlValue::Text("a".into()));
//! ```

mod bind;
mod config;
mod dialect;
mod error;
mod extension;
mod lookup;
mod translate;

pub use bind::parse_value;
pub use config::TranslationConfig;
pub use dialect::MySqlDialect;
pub use error::{Result, TranslateError};
pub use extension::translate_extensions;
pub use lookup::{ColumnTranslation, MappedSchema, SchemaLookup};
pub use translate::{translate_query, translate_sql, TranslatedQuery};
