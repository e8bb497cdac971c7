//! Translation errors.

use oxide_tql_core::{ParseError, TreeError};

/// Errors raised while translating a query for MySQL.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// `HAS`, `HAS_LIKE` or `UNNEST` was applied to a scalar column.
    #[error("UNNEST() only works for columns that hold list values: {0}")]
    NotAListColumn(String),

    /// A column reference has no physical counterpart.
    #[error("Column does not exist: {0}")]
    UnknownColumn(String),

    /// A table reference has no physical counterpart.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// `CURRENT_USER()` was used but no user id is configured.
    #[error("CURRENT_USER() requires a user id")]
    NoCurrentUser,

    /// A rewrite produced an invalid tree.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A query could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for translation.
pub type Result<T> = std::result::Result<T, TranslateError>;
